//! Random data helpers for fixtures

use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Camille", "Léa", "Manon", "Chloé", "Inès", "Jade", "Louise", "Zoé", "Juliette", "Margaux",
    "Lucas", "Hugo", "Louis", "Gabriel", "Arthur", "Jules", "Nathan", "Théo", "Raphaël", "Mathis",
];

const LAST_NAMES: &[&str] = &[
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefebvre", "Michel", "Garcia", "David", "Bertrand", "Roux",
    "Vincent", "Fournier",
];

/// `n` random ASCII digits
pub fn generate_digits(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Unique throwaway address on `domain`
pub fn generate_email(domain: &str) -> String {
    format!("qa+{}@{}", hex::encode(rand::random::<[u8; 8]>()), domain)
}

pub fn first_name() -> String {
    pick(FIRST_NAMES)
}

pub fn last_name() -> String {
    pick(LAST_NAMES)
}

fn pick(names: &[&str]) -> String {
    names
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Dupont")
        .to_string()
}
