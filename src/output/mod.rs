// Output module - Progress and result lines printed while harvesting

pub mod terminal;

pub use terminal::{
    print_done, print_extracted, print_fetched, print_redirect, print_resolved, print_saving,
    print_section_header, print_skipped, print_summary,
};
