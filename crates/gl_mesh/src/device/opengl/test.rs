use super::{draw_count, upload_error};
use crate::error::DeviceError;

#[test]
fn test_upload_error() {
	assert_eq!(upload_error(gl::NO_ERROR), None);
	assert_eq!(upload_error(gl::OUT_OF_MEMORY), Some(DeviceError::OutOfMemory));
	assert_eq!(upload_error(gl::INVALID_VALUE), Some(DeviceError::Driver(gl::INVALID_VALUE)));
	assert_eq!(
		upload_error(gl::INVALID_OPERATION),
		Some(DeviceError::Driver(gl::INVALID_OPERATION))
	);
}

#[test]
fn test_draw_count_fits_glsizei() {
	assert_eq!(draw_count(6), Some(6));
	assert_eq!(draw_count(i32::MAX as usize), Some(i32::MAX));
	assert_eq!(draw_count(i32::MAX as usize + 1), None);
}
