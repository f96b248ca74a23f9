use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(100, 128), 50);
}

#[test]
fn seeded_rng_is_reproducible() {
    let mut a = SeededRng::new(42);
    let mut b = SeededRng::new(42);
    let xs: Vec<u64> = (0..16).map(|_| a.next_u64()).collect();
    let ys: Vec<u64> = (0..16).map(|_| b.next_u64()).collect();
    assert_eq!(xs, ys);

    let mut c = SeededRng::new(43);
    let zs: Vec<u64> = (0..16).map(|_| c.next_u64()).collect();
    assert_ne!(xs, zs);
}

#[test]
fn seeded_rng_ranges_stay_in_bounds() {
    let mut rng = SeededRng::new(7);
    for _ in 0..1000 {
        let v = rng.range_inclusive(8, 40);
        assert!((8..=40).contains(&v));
    }
    assert_eq!(rng.range_inclusive(5, 5), 5);
    assert_eq!(rng.range_inclusive(9, 3), 9);
}
