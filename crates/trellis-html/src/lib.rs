//! Per-tag constructor sugar over `trellis_core::el`.
//!
//! ```rust
//! use trellis_core::Props;
//! use trellis_html::{article, h3, text};
//!
//! let card = article(Props::default(), [h3(Props::default(), [text("Title")])]);
//! # let _ = card;
//! ```

pub mod template;

use trellis_core::el;
pub use trellis_core::{component, Descriptor, Props};

pub fn text(content: impl Into<String>) -> Descriptor {
    Descriptor::text(content)
}

macro_rules! tag_fns {
    ($($name:ident)*) => {
        $(
            pub fn $name(
                props: Props,
                children: impl IntoIterator<Item = Descriptor>,
            ) -> Descriptor {
                el(stringify!($name), props, children)
            }
        )*
    };
}

tag_fns! {
    article aside button div footer form h1 h2 h3 header input label li
    main nav ol p section span ul
}
