//! Pythagorean numerology, single-sourced.
//!
//! Every consumer (the offline CLI path included) computes through this
//! module, so there is exactly one copy of the reduction and letter-table
//! logic to drift.

use serde::Serialize;

/// Master numbers are never reduced further.
const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Pythagorean letter value: a=1..i=9, j=1..r=9, s=1..z=8.
fn letter_value(c: char) -> Option<u32> {
    if c.is_ascii_alphabetic() {
        let index = (c.to_ascii_lowercase() as u32) - ('a' as u32);
        Some(index % 9 + 1)
    } else {
        None
    }
}

fn is_master(num: u32) -> bool {
    MASTER_NUMBERS.contains(&num)
}

/// Repeatedly sums decimal digits until the result is a single digit,
/// stopping early on a master number.
pub fn reduce(mut num: u32) -> u32 {
    while num > 9 && !is_master(num) {
        let mut sum = 0;
        let mut n = num;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        num = sum;
    }
    num
}

/// Life Path Number: day, month and year are reduced individually before
/// their sum is reduced, with the master-number exception at every step.
pub fn life_path(day: u32, month: u32, year: u32) -> u32 {
    reduce(reduce(day) + reduce(month) + reduce(year))
}

/// Destiny/Expression Number over all letters of the name.
pub fn destiny(name: &str) -> u32 {
    reduce(name.chars().filter_map(letter_value).sum())
}

/// Soul Urge Number over vowels only.
pub fn soul_urge(name: &str) -> u32 {
    reduce(
        name.chars()
            .filter(|c| VOWELS.contains(&c.to_ascii_lowercase()))
            .filter_map(letter_value)
            .sum(),
    )
}

/// Personality Number over consonants only.
pub fn personality(name: &str) -> u32 {
    reduce(
        name.chars()
            .filter(|c| !VOWELS.contains(&c.to_ascii_lowercase()))
            .filter_map(letter_value)
            .sum(),
    )
}

/// Birthday Number: the day of month alone, reduced.
pub fn birthday(day: u32) -> u32 {
    reduce(day)
}

/// The five numbers for one person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumerologyProfile {
    pub life_path: u32,
    pub destiny: u32,
    pub soul_urge: u32,
    pub personality: u32,
    pub birthday: u32,
}

impl NumerologyProfile {
    pub fn compute(name: &str, day: u32, month: u32, year: u32) -> Self {
        Self {
            life_path: life_path(day, month, year),
            destiny: destiny(name),
            soul_urge: soul_urge(name),
            personality: personality(name),
            birthday: birthday(day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_table_matches_pythagorean_chart() {
        assert_eq!(letter_value('a'), Some(1));
        assert_eq!(letter_value('i'), Some(9));
        assert_eq!(letter_value('j'), Some(1));
        assert_eq!(letter_value('r'), Some(9));
        assert_eq!(letter_value('s'), Some(1));
        assert_eq!(letter_value('z'), Some(8));
        assert_eq!(letter_value('E'), Some(5));
        assert_eq!(letter_value(' '), None);
        assert_eq!(letter_value('7'), None);
    }

    #[test]
    fn test_reduce_golden_vectors() {
        // 1+9+9+0 = 19 -> 10 -> 1
        assert_eq!(reduce(1990), 1);
        assert_eq!(reduce(0), 0);
        assert_eq!(reduce(9), 9);
        assert_eq!(reduce(10), 1);
        assert_eq!(reduce(29), 11);
    }

    #[test]
    fn test_reduce_preserves_master_numbers() {
        assert_eq!(reduce(11), 11);
        assert_eq!(reduce(22), 22);
        assert_eq!(reduce(33), 33);
        // 2+9+9 = 20 -> 2; 299 is not stopped at.
        assert_eq!(reduce(299), 2);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        for n in 0..=4000 {
            let once = reduce(n);
            assert_eq!(reduce(once), once);
        }
    }

    #[test]
    fn test_life_path_golden_vectors() {
        // 29 -> 11 (master), 11 -> 11 (master), 1990 -> 1; 11+11+1 = 23 -> 5.
        assert_eq!(life_path(29, 11, 1990), 5);
        // Master landings.
        assert_eq!(life_path(29, 9, 2000), 22); // 11 + 9 + 2
        assert_eq!(life_path(22, 2, 1935), 33); // 22 + 2 + 9
        assert_eq!(life_path(5, 3, 1929), 11); // 5 + 3 + 3
    }

    #[test]
    fn test_name_numbers_golden_vectors() {
        // Amit: 1 + 4 + 9 + 2 = 16 -> 7.
        assert_eq!(destiny("Amit"), 7);
        assert_eq!(destiny("AMIT"), 7);
        assert_eq!(destiny("amit"), 7);
        // Vowels a(1) + i(9) = 10 -> 1.
        assert_eq!(soul_urge("Amit"), 1);
        // Consonants m(4) + t(2) = 6.
        assert_eq!(personality("Amit"), 6);
        assert_eq!(birthday(29), 11);
    }

    #[test]
    fn test_non_letters_are_ignored() {
        assert_eq!(destiny("Amit Sharma"), destiny("AmitSharma"));
        assert_eq!(destiny(""), 0);
        assert_eq!(soul_urge("xyz"), 0);
    }

    #[test]
    fn test_profile_aggregates_consistently() {
        let profile = NumerologyProfile::compute("Amit", 29, 11, 1990);
        assert_eq!(profile.life_path, life_path(29, 11, 1990));
        assert_eq!(profile.destiny, 7);
        assert_eq!(profile.soul_urge, 1);
        assert_eq!(profile.personality, 6);
        assert_eq!(profile.birthday, 11);
    }
}
