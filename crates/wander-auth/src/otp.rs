//! One-time code generation.

/// Generate a six-decimal-digit code, uniform over `000000..=999999`.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let n: u32 = rand::Rng::random_range(&mut rng, 0..1_000_000);
    format!("{n:06}")
}
