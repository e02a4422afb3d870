pub mod complaint;
