//! Fixed sample feed used by the demo host.

use crate::headline::Headline;
use crate::ids::ItemId;

const SAMPLE: &[(&str, &str)] = &[
    ("markets", "Index futures edge higher ahead of the open"),
    ("weather", "Coastal fog clears by midday"),
    ("sports", "Extra-time winner sends hosts through"),
    ("tech", "Compiler release trims build times"),
    ("transit", "Line 4 running with minor delays"),
];

/// The sample headlines with stable, seeded identities.
pub fn sample_headlines() -> Vec<Headline> {
    SAMPLE
        .iter()
        .enumerate()
        .map(|(index, (source, title))| {
            Headline::with_id(ItemId::from_u128(index as u128 + 1), *source, *title)
        })
        .collect()
}
