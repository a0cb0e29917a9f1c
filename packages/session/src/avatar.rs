//! # Avatar URL resolution
//!
//! Avatars fall back in two stages:
//!
//! 1. [`resolve_avatar_url`] picks the profile's own image, or the generic
//!    silhouette (`assets.placeholder_avatar`) when there is none.
//! 2. If whatever stage one picked fails to load in the browser, the renderer
//!    swaps to [`fallback_avatar_url`] (`assets.fallback_avatar`). Only the
//!    renderer can observe a broken image, so stage two lives there.
//!
//! Both functions are pure.

use crate::config::AssetsConfig;
use crate::Profile;

/// Stage-one avatar URL for `profile`.
pub fn resolve_avatar_url(profile: Option<&Profile>, assets: &AssetsConfig) -> String {
    let path = profile
        .and_then(|p| p.avatar_path.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty());

    match path {
        Some(path) if is_full_url(path) => path.to_string(),
        Some(path) => join_asset(&assets.base_url, path),
        None => assets.placeholder_avatar.clone(),
    }
}

/// Stage-two URL, for when the stage-one image fails to load.
pub fn fallback_avatar_url(assets: &AssetsConfig) -> String {
    assets.fallback_avatar.clone()
}

fn is_full_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn join_asset(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn profile_with(avatar: Option<&str>) -> Profile {
        Profile {
            id: 1,
            full_name: "Ada".to_string(),
            role: Role::Teacher,
            avatar_path: avatar.map(str::to_string),
        }
    }

    #[test]
    fn test_server_relative_and_absolute_paths() {
        let assets = AssetsConfig::default();
        assert_eq!(
            resolve_avatar_url(Some(&profile_with(Some("/media/a.png"))), &assets),
            "http://localhost:8000/media/a.png"
        );
        assert_eq!(
            resolve_avatar_url(Some(&profile_with(Some("media/a.png"))), &assets),
            "http://localhost:8000/media/a.png"
        );
    }

    #[test]
    fn test_full_url_passes_through() {
        let assets = AssetsConfig::default();
        let url = "https://cdn.example.edu/u/1.jpg";
        assert_eq!(resolve_avatar_url(Some(&profile_with(Some(url))), &assets), url);
    }

    #[test]
    fn test_missing_avatar_uses_placeholder() {
        let assets = AssetsConfig::default();
        assert_eq!(resolve_avatar_url(None, &assets), assets.placeholder_avatar);
        assert_eq!(
            resolve_avatar_url(Some(&profile_with(None)), &assets),
            assets.placeholder_avatar
        );
        assert_eq!(
            resolve_avatar_url(Some(&profile_with(Some("   "))), &assets),
            assets.placeholder_avatar
        );
    }

    #[test]
    fn test_pure_and_stages_differ() {
        let assets = AssetsConfig {
            base_url: "https://portal.example.edu/".to_string(),
            ..AssetsConfig::default()
        };
        let profile = profile_with(Some("/media/x.png"));
        let first = resolve_avatar_url(Some(&profile), &assets);
        let second = resolve_avatar_url(Some(&profile), &assets);
        assert_eq!(first, second);
        assert_eq!(first, "https://portal.example.edu/media/x.png");
        assert_ne!(fallback_avatar_url(&assets), assets.placeholder_avatar);
    }
}
