pub mod decode;
pub mod pitch_track;
