use std::path::PathBuf;

use textcard::FontHandle;

/// A font from this machine, or `None` when no known font is installed.
///
/// `TEXTCARD_TEST_FONT` takes precedence over the built-in search paths.
pub fn system_font(size: u32) -> Option<FontHandle> {
    let mut candidates: Vec<PathBuf> = std::env::var("TEXTCARD_TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .collect();
    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ]
        .iter()
        .map(PathBuf::from),
    );
    let found = candidates
        .into_iter()
        .find_map(|p| FontHandle::from_file(p, size).ok());
    if found.is_none() {
        println!("No system font found; set TEXTCARD_TEST_FONT to run this test. Skipping.");
    }
    found
}
