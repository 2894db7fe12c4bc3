use crate::domain::models::Platform;

/// Signatures in priority order; the first one found wins.
const SIGNATURES: [(&str, Platform); 4] = [
    ("wordpress", Platform::WordPress),
    ("shopify", Platform::Shopify),
    ("wix", Platform::Wix),
    ("squarespace", Platform::Squarespace),
];

/// Guess the hosting platform from raw markup.
pub fn detect_platform(markup: &str) -> Platform {
    let lower = markup.to_lowercase();
    SIGNATURES
        .iter()
        .find(|(signature, _)| lower.contains(*signature))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Custom)
}
