//! The counter component driven headlessly: mount, type `3` into the input,
//! click Increment, and print the document after each step.
//!
//! Run with `RUST_LOG=trace` to watch the reconciler work.

use trellis_core::{component, mount, Descriptor, Props, StateSetter, StateSlot};
use trellis_dom::{Document, Event};
use trellis_html::{button, div, h1, input};

#[derive(Clone, Copy, Default)]
struct CounterState {
    count: i64,
    value: i64,
}

fn counter(_: &Props, _: &[Descriptor], state: &StateSlot, set: &StateSetter) -> Descriptor {
    let s = state.get_or(CounterState::default());

    let on_change = {
        let set = set.clone();
        move |ev: &Event| {
            let value = ev.value().and_then(|v| v.parse().ok()).unwrap_or(0);
            set.set(CounterState { value, ..s });
        }
    };
    let on_click = {
        let set = set.clone();
        move |_: &Event| {
            set.set(CounterState {
                count: s.count + s.value,
                ..s
            })
        }
    };

    div(
        Props::default(),
        [
            h1(Props::default(), [s.count.into()]),
            input(
                Props::new()
                    .attr("type", "number")
                    .attr("value", s.value)
                    .on("change", on_change),
                [],
            ),
            button(Props::new().on("click", on_click), ["Increment".into()]),
        ],
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let doc = Document::new();
    let body = doc.create_element("body");
    let container = doc.create_element("div");
    doc.append_child(body, container)?;

    let app = mount(&doc, container, component(counter, Props::default(), []))?;
    println!("mounted:   {}", doc.to_html(body)?);

    let field = doc
        .child_at(app.node(), 1)?
        .ok_or_else(|| anyhow::anyhow!("input not rendered"))?;
    doc.dispatch(field, &Event::with_value("change", "3"))?;
    println!("typed 3:   {}", doc.to_html(body)?);

    let increment = doc
        .child_at(app.node(), 2)?
        .ok_or_else(|| anyhow::anyhow!("button not rendered"))?;
    doc.dispatch(increment, &Event::new("click"))?;
    println!("clicked:   {}", doc.to_html(body)?);

    Ok(())
}
