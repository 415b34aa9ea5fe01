//! CSS selectors into the Google Photos single-photo view.
//!
//! These belong to a third-party page and can break without notice on any
//! markup change. When they stop matching, the locator reports nothing
//! found and the dispatcher no-ops; nothing here can detect that beyond
//! the lack of progress.

/// The photo on display in the single-photo view.
pub const PHOTO_IMAGE: &str = "img.BiCYpc";

/// Toolbar control that moves the current photo to the trash.
pub const DELETE_BUTTON: &str = r#"[aria-label="Mover a la papelera"]"#;

/// Confirmation control in the move-to-trash dialog. Two markup variants
/// have been observed in the wild.
pub const CONFIRM_DELETE: &[&str] = &[
    r#"span.mUIrbf-vQzf8d[jsname="V67aGc"]"#,
    r#"button[data-mdc-dialog-action="EBS5u"]"#,
];

/// "Next photo" controls, one per locale label variant, in preference
/// order. The dispatcher clicks the first that exists.
pub const NEXT_BUTTONS: &[&str] = &[
    r#"[aria-label="Ver la foto siguiente"]"#,
    r#"[aria-label="Ver siguiente foto"]"#,
    r#"[aria-label="View next photo"]"#,
    r#"[aria-label="Siguiente"]"#,
    r#"[aria-label="Next"]"#,
];

/// Address prefix of the single-photo view. Operations are gated on the
/// active page matching this; anywhere else in Google Photos the toolbar
/// selectors above do not exist.
pub const PHOTO_VIEW_PREFIX: &str = "https://photos.google.com/photo/";

/// Whether `url` is a single-photo view this tool may operate on.
pub fn is_photo_view(url: &str) -> bool {
    url.starts_with(PHOTO_VIEW_PREFIX)
}
