use crate::domain::ProductTemplate;

/// The workshop's standard product line-up.
pub fn default_catalog() -> Vec<ProductTemplate> {
    vec![
        ProductTemplate::new("burnPad", "Burn Pad", &["baseColor", "corduraColor", "logoColor"], 0),
        ProductTemplate::new(
            "foamPad",
            "Foam Pad",
            &["baseColor", "seatColor", "trimColor", "pipingColor", "wearLeatherColor", "logoColor"],
            1,
        ),
        ProductTemplate::new("bandageHolder", "Bandage Holder", &["baseColor", "logoColor", "grommetColor"], 2),
        ProductTemplate::new("paddockBag", "Paddock Bag", &["baseColor", "handleColor", "logoColor"], 3),
        ProductTemplate::new("schoolingPad", "Schooling Pad", &["baseColor", "pipingColor", "logoColor"], 4),
        ProductTemplate::new("raincover", "Raincover", &["baseColor", "logoColor"], 5),
        ProductTemplate::new("blanket", "Blanket", &["type", "baseColor", "trimColor", "logoColor"], 6),
        ProductTemplate::new(
            "saddle",
            "Saddle",
            &["type", "baseColor", "stitchColor", "topAccentColor", "bottomAccentColor"],
            7,
        ),
    ]
}
