use crate::{config, utils};

/// Length of generated encryption secrets.
const SECRET_LENGTH: usize = 48;

/// Prints a fresh secret as a ready-to-paste `.env` line.
pub fn keygen() {
    println!("{}={}", config::LYRICIST_KEY, utils::random_token(SECRET_LENGTH));
}
