mod redistricter;

pub use redistricter::Redistricter;
