pub(crate) mod collect_sorted;
pub(crate) mod combine;
pub(crate) mod joins;
pub(crate) mod keyed;
pub(crate) mod sort;
pub(crate) mod topk;
pub(crate) mod values;
