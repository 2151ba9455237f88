//! Random nicknames and single-use tokens.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "clever", "jolly", "brave", "sly", "gentle", "swift", "quiet", "bold", "calm", "eager",
    "happy", "lucky", "mighty", "noble", "proud", "witty",
];

const ANIMALS: &[&str] = &[
    "panda", "fox", "raccoon", "koala", "lion", "otter", "owl", "lynx", "heron", "badger",
    "falcon", "wolf", "tiger", "bison", "beaver", "crane",
];

const VERIFICATION_TOKEN_LEN: usize = 32;

/// A nickname of the form `adjective_animal_NNN`.
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quiet");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("owl");
    format!("{}_{}_{}", adjective, animal, rng.gen_range(0..1000))
}

/// URL-safe token used for email verification and invitations.
pub fn generate_verification_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
