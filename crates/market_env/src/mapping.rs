//! Translation of observable identifiers into vendor identifiers.
//!
//! Calculations request observables by their logical identifier; a market
//! data provider may know the same quote under a different standard ID. A
//! [`VendorIdMapping`] performs that translation before the provider is asked.

use std::collections::HashMap;

use market_core::ids::{MarketDataVendor, ObservableId, StandardId};

/// Maps an observable identifier to the identifier used by a vendor.
///
/// Any `Fn(&ObservableId) -> ObservableId` is a mapping:
///
/// ```
/// use market_core::ids::{MarketDataVendor, ObservableId, StandardId};
/// use market_env::mapping::VendorIdMapping;
///
/// let to_vendor = |id: &ObservableId| id.clone().with_vendor(MarketDataVendor::new("BBG"));
/// let id = ObservableId::new(StandardId::of("OG-Ticker", "EURUSD").unwrap());
///
/// assert_eq!(to_vendor.id_for_vendor(&id).vendor().as_str(), "BBG");
/// ```
pub trait VendorIdMapping {
    /// The identifier of `id` in the vendor's symbology.
    fn id_for_vendor(&self, id: &ObservableId) -> ObservableId;
}

impl<F> VendorIdMapping for F
where
    F: Fn(&ObservableId) -> ObservableId,
{
    fn id_for_vendor(&self, id: &ObservableId) -> ObservableId {
        self(id)
    }
}

/// Mapping that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityMapping;

impl VendorIdMapping for IdentityMapping {
    #[inline]
    fn id_for_vendor(&self, id: &ObservableId) -> ObservableId {
        id.clone()
    }
}

/// Mapping driven by a table of standard ID translations.
///
/// IDs without an entry keep their standard ID. When a vendor is configured
/// it replaces the vendor of every mapped identifier.
#[derive(Debug, Clone, Default)]
pub struct StandardIdTable {
    table: HashMap<StandardId, StandardId>,
    vendor: Option<MarketDataVendor>,
}

impl StandardIdTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a translation from `from` to `to`.
    pub fn with_entry(mut self, from: StandardId, to: StandardId) -> Self {
        self.table.insert(from, to);
        self
    }

    /// Tags mapped identifiers with `vendor`.
    pub fn with_vendor(mut self, vendor: MarketDataVendor) -> Self {
        self.vendor = Some(vendor);
        self
    }

    /// Number of translations.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the table has no translations.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl VendorIdMapping for StandardIdTable {
    fn id_for_vendor(&self, id: &ObservableId) -> ObservableId {
        let mut mapped = match self.table.get(id.standard_id()) {
            Some(standard_id) => id.clone().with_standard_id(standard_id.clone()),
            None => id.clone(),
        };
        if let Some(vendor) = &self.vendor {
            mapped = mapped.with_vendor(vendor.clone());
        }
        mapped
    }
}
