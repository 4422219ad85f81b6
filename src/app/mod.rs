// Application layer - Use case interactors

pub mod batch_interactor;
pub mod clip_splitter;
pub mod inspect_interactor;
pub mod video_enumerator;

// Re-export interactors
pub use batch_interactor::BatchInteractor;
pub use clip_splitter::ClipSplitter;
pub use inspect_interactor::{InspectInteractor, InspectRequest, InspectResponse, VideoInspection};
pub use video_enumerator::VideoEnumerator;
