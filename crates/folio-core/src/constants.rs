/// Hard ceiling for a single uploaded photo (10 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Human readable form of [`MAX_FILE_SIZE_BYTES`] reported by the storage info endpoint.
pub const MAX_FILE_SIZE_LABEL: &str = "10MB";

/// Extensions accepted for photo uploads, lower-case and without the dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Every accepted upload must declare a content type under this media type.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// Reserved subject for requests that carry no valid token.
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Photo type used for the single profile picture of a user.
pub const PROFILE_PHOTO_TYPE: &str = "profile";

/// Parent folder for the portfolio section photo types.
pub const PORTFOLIO_PHOTO_PREFIX: &str = "medical-portfolio";
