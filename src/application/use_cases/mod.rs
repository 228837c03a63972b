mod session;

pub use session::CsvSession;
