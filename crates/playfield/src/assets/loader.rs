//! Image loading seam and animation construction from file lists.

use crate::api::types::ImageHandle;
use crate::assets::error::AssetError;
use crate::components::animation::Animation;

/// Source of decoded images. The host (or a test double) owns the pixels;
/// the runtime only keeps handles.
pub trait AssetLoader {
    fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError>;
}

/// A file name split around its trailing frame number:
/// `"walk001.png"` is `("walk", "001", ".png")`.
fn split_numbered(path: &str) -> Option<(&str, &str, &str)> {
    let dot = path.rfind('.').unwrap_or(path.len());
    let (stem, ext) = path.split_at(dot);
    let digits_len = stem.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    let (prefix, digits) = stem.split_at(stem.len() - digits_len);
    Some((prefix, digits, ext))
}

/// Whether two paths name the ends of a numbered range: same prefix and
/// extension, both ending in a frame number.
pub fn is_sequence(first: &str, last: &str) -> bool {
    match (split_numbered(first), split_numbered(last)) {
        (Some((p1, _, e1)), Some((p2, _, e2))) => p1 == p2 && e1 == e2,
        _ => false,
    }
}

/// Expand `"walk001.png", "walk005.png"` into the five file names between
/// them. The first name's zero padding is kept.
pub fn expand_sequence(first: &str, last: &str) -> Result<Vec<String>, AssetError> {
    let invalid = || AssetError::InvalidSequence {
        first: first.to_string(),
        last: last.to_string(),
    };

    let (prefix, from_digits, ext) = split_numbered(first).ok_or_else(invalid)?;
    let (prefix_last, to_digits, ext_last) = split_numbered(last).ok_or_else(invalid)?;
    if prefix != prefix_last || ext != ext_last {
        return Err(invalid());
    }

    let from: u32 = from_digits.parse().map_err(|_| invalid())?;
    let to: u32 = to_digits.parse().map_err(|_| invalid())?;
    if to < from {
        return Err(invalid());
    }

    let width = from_digits.len();
    Ok((from..=to)
        .map(|n| format!("{prefix}{n:0width$}{ext}"))
        .collect())
}

/// Load an animation from either a numbered range (exactly two paths that
/// form a sequence) or an explicit list of files, in order.
pub fn load_animation(loader: &mut impl AssetLoader, files: &[&str]) -> Result<Animation, AssetError> {
    let paths: Vec<String> = match files {
        [] => return Err(AssetError::EmptyAnimation),
        [first, last] if is_sequence(first, last) => expand_sequence(first, last)?,
        _ => files.iter().map(|f| f.to_string()).collect(),
    };

    let images = paths
        .iter()
        .map(|p| loader.load_image(p))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("loaded animation with {} frames", images.len());
    Ok(Animation::from_images(images))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Hands out sequential ids and records every path requested.
    #[derive(Default)]
    pub(crate) struct FakeLoader {
        pub loaded: Vec<String>,
        pub missing: Vec<String>,
        pub sizes: HashMap<String, (f32, f32)>,
    }

    impl AssetLoader for FakeLoader {
        fn load_image(&mut self, path: &str) -> Result<ImageHandle, AssetError> {
            if self.missing.iter().any(|m| m == path) {
                return Err(AssetError::Io(format!("{path}: not found")));
            }
            let (w, h) = self.sizes.get(path).copied().unwrap_or((16.0, 16.0));
            self.loaded.push(path.to_string());
            Ok(ImageHandle::new(self.loaded.len() as u32, w, h))
        }
    }

    #[test]
    fn sequence_keeps_zero_padding() {
        let files = expand_sequence("walk001.png", "walk005.png").unwrap();
        assert_eq!(
            files,
            vec!["walk001.png", "walk002.png", "walk003.png", "walk004.png", "walk005.png"]
        );
        let files = expand_sequence("fx/boom9.png", "fx/boom11.png").unwrap();
        assert_eq!(files, vec!["fx/boom9.png", "fx/boom10.png", "fx/boom11.png"]);
    }

    #[test]
    fn reversed_range_is_invalid() {
        let err = expand_sequence("walk005.png", "walk001.png").unwrap_err();
        assert!(matches!(err, AssetError::InvalidSequence { .. }));
        assert!(expand_sequence("walk.png", "walk002.png").is_err());
    }

    #[test]
    fn two_unrelated_files_are_a_list() {
        let mut loader = FakeLoader::default();
        let anim = load_animation(&mut loader, &["idle.png", "jump.png"]).unwrap();
        assert_eq!(anim.frame_count(), 2);
        assert_eq!(loader.loaded, vec!["idle.png", "jump.png"]);
    }

    #[test]
    fn numbered_pair_expands() {
        let mut loader = FakeLoader::default();
        let anim = load_animation(&mut loader, &["run01.png", "run04.png"]).unwrap();
        assert_eq!(anim.frame_count(), 4);
        assert_eq!(loader.loaded[3], "run04.png");
    }

    #[test]
    fn errors_propagate() {
        let mut loader = FakeLoader::default();
        assert_eq!(load_animation(&mut loader, &[]).unwrap_err(), AssetError::EmptyAnimation);

        loader.missing.push("b.png".into());
        let err = load_animation(&mut loader, &["a.png", "b.png", "c.png"]).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
        assert!(err.to_string().contains("b.png"));
    }
}
