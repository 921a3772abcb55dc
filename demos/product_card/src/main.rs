//! The product card rendered twice: once through the reconciler (with a
//! live add-to-cart handler) and once through the templated-string
//! baseline, which rebuilds the container wholesale on every call.

use trellis_core::{mount, Descriptor, Props};
use trellis_dom::{Document, Event};
use trellis_html::template::{product_card_markup, replace_contents};
use trellis_html::{article, button, div, h3, p, text};

#[derive(Clone)]
struct Product {
    id: u32,
    name: String,
    price: String,
    description: String,
}

fn catalog_entry() -> Product {
    Product {
        id: 12,
        name: "My Cool Product".into(),
        price: "$139.99".into(),
        description: "Thats a nice product why dont you buy it".into(),
    }
}

fn add_to_cart(product_id: u32) {
    log::info!("add to cart call {product_id}");
}

fn product_card(product: &Product) -> Descriptor {
    let id = product.id;
    article(
        Props::default(),
        [
            h3(Props::default(), [text(&product.name)]),
            div(Props::default(), [text(&product.price)]),
            p(Props::default(), [text(&product.description)]),
            button(
                Props::new().on("click", move |_| add_to_cart(id)),
                [text("Add To Cart")],
            ),
        ],
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let product = catalog_entry();

    // through the reconciler
    let doc = Document::new();
    let body = doc.create_element("body");
    let container = doc.create_element("article");
    doc.append_child(body, container)?;

    let card = mount(&doc, container, product_card(&product))?;
    let buy = doc
        .child_at(card.node(), 3)?
        .ok_or_else(|| anyhow::anyhow!("buy button not rendered"))?;
    doc.dispatch(buy, &Event::new("click"))?;
    println!("reconciled: {}", doc.to_html(body)?);

    // through the baseline, which never reuses anything
    let baseline = doc.create_element("div");
    doc.append_child(body, baseline)?;
    let markup = product_card_markup(&product.name, &product.price, &product.description);
    replace_contents(&doc, baseline, &markup)?;
    replace_contents(&doc, baseline, &markup)?;
    println!("baseline:   {}", doc.text_content(baseline)?);

    Ok(())
}
