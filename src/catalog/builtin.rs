//! Catalog documents compiled into the crate.

/// `(file name, JSON text)` for each family, in load order.
pub(crate) const CATALOG_DOCUMENTS: &[(&str, &str)] = &[
    ("noise.json", include_str!("../../catalog/noise.json")),
    ("warp.json", include_str!("../../catalog/warp.json")),
    ("blend.json", include_str!("../../catalog/blend.json")),
    ("color.json", include_str!("../../catalog/color.json")),
];
