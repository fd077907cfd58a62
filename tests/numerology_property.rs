use numera::domain::numerology::{self, NumerologyProfile};
use rand::Rng;

fn is_valid_result(n: u32) -> bool {
    (1..=9).contains(&n) || n == 11 || n == 22 || n == 33
}

#[test]
fn test_life_path_always_lands_in_valid_set() {
    let mut rng = rand::thread_rng();
    for _ in 0..10_000 {
        let day = rng.gen_range(1..=31);
        let month = rng.gen_range(1..=12);
        let year = rng.gen_range(1900..=2026);
        let result = numerology::life_path(day, month, year);
        assert!(
            is_valid_result(result),
            "life_path({day}, {month}, {year}) = {result}"
        );
    }
}

#[test]
fn test_reduction_is_idempotent_over_random_inputs() {
    let mut rng = rand::thread_rng();
    for _ in 0..10_000 {
        let n: u32 = rng.gen_range(0..=1_000_000);
        let once = numerology::reduce(n);
        assert_eq!(numerology::reduce(once), once, "reduce({n})");
    }
}

#[test]
fn test_case_change_never_changes_name_numbers() {
    let mut rng = rand::thread_rng();
    for _ in 0..1_000 {
        let len = rng.gen_range(1..=30);
        let name: String = (0..len)
            .map(|_| (b'a' + rng.gen_range(0..26)) as char)
            .collect();
        let upper = name.to_uppercase();
        let profile_lower = NumerologyProfile::compute(&name, 1, 1, 2000);
        let profile_upper = NumerologyProfile::compute(&upper, 1, 1, 2000);
        assert_eq!(profile_lower, profile_upper, "{name}");
    }
}
