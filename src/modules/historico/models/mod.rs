pub mod tax_record;

pub use tax_record::{
    AnnotatedRecord, ChartPoint, HistoryFilter, HistoryView, PeriodComparison, PeriodRange,
    SaveMonthRequest, Statistics, TaxRecord, Variation,
};
