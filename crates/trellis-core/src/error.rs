use thiserror::Error;
use trellis_dom::DomError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A handler prop whose key does not follow the `on<Name>` convention,
    /// so no event name can be derived from it.
    #[error("handler prop `{key}` does not name an event (expected `on<Name>`)")]
    MalformedEventProp { key: String },

    #[error("mount container has no parent node")]
    DetachedContainer,
}
