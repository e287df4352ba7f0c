pub mod harvester;
pub mod media;
pub mod publisher;
pub mod rewriter;
pub mod scheduler;
pub mod store;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use harvester::{HarvestReport, Harvester};
pub use media::MediaFetcher;
pub use publisher::{PublishOutcome, Publisher};
pub use rewriter::CaptionRewriter;
pub use scheduler::{Schedule, Scheduler, Task};
pub use store::{PostStore, StoreError};
