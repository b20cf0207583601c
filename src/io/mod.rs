mod locate;
mod mapped;
mod mode;
mod sample;

pub use locate::{locate_stack_files, StackFiles};
pub use mapped::MappedRaw;
pub use mode::AccessMode;
pub use sample::{decode_samples, read_u16_be, write_u16_be, SAMPLE_SIZE};
