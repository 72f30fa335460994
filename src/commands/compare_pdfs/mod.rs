mod diff;
mod run;

pub use run::run;
