//! Application use cases. Orchestrate domain logic via ports.

pub mod audience_resolver;
pub mod batch_dispatcher;
pub mod dispatch_service;
pub mod message_renderer;

#[cfg(test)]
pub(crate) mod test_support;

pub use audience_resolver::AudienceResolver;
pub use batch_dispatcher::{BatchDispatcher, MAX_BATCH_SIZE, partition};
pub use dispatch_service::DispatchService;
pub use message_renderer::{MessageRenderer, RenderOptions, TemplateAudience};
