//! Example: scrape a signup form and restyle its fields
//!
//! Run with `RUST_LOG=blaster=debug` to see selector and dispatch logs.

use blaster::{Arg, Blaster, BlasterConfig};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><style>form.signup { color: navy }</style></head>
<body>
  <form id="signup" class="signup">
    <input name="user" value="ann">
    <input type="checkbox" name="topics" value="rust" checked>
    <input type="checkbox" name="topics" value="dom" checked>
    <input type="checkbox" name="topics" value="css">
    <select name="plan"><option value="free">Free</option><option value="pro" selected>Pro</option></select>
    <fieldset disabled><input name="coupon" value="HALF"></fieldset>
  </form>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BlasterConfig::from_toml_str(r#"modules = ["attributes", "css", "forms"]"#)?;
    let blaster = Blaster::with_config(config)?;
    println!("DOMBlaster v{} loaded {:?}", blaster::VERSION, blaster.modules());

    let mut document = blaster::html::parse(PAGE)?;
    let mut dom = blaster.bind(&mut document);

    let form = dom.select("#signup", true);
    let data = dom.call(&form, "formData", &[])?;
    println!("formData: {}", serde_json::to_string_pretty(&data)?);

    let inputs = dom.select("input:not([type=checkbox])", false);
    dom.call(&inputs, "addClass", &[Arg::list(["field", "wide"])])?;
    dom.call(&inputs, "style", &["borderColor".into(), "teal".into()])?;
    let color = dom.call(&inputs, "styleComputed", &["color".into()])?;
    println!("input color: {}", serde_json::to_string(&color)?);

    let markup = blaster::html::outer_html(dom.tree(), inputs.first().unwrap_or(blaster::dom::NodeId::ROOT));
    println!("first input: {markup}");
    Ok(())
}
