pub mod asset;
pub mod session;

pub use asset::{AssetSource, ImageAsset};
pub use session::{DiagnosisSession, SessionView, ACTIVE_IMAGE_URL};
