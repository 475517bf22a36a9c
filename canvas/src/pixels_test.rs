use super::*;

#[test]
fn new_buffer_is_transparent_and_sized() {
    let buf = PixelBuffer::new(3, 2);
    assert_eq!(buf.data().len(), 3 * 2 * 4);
    assert!(buf.data().iter().all(|&b| b == 0));
}

#[test]
fn from_rgba_enforces_length() {
    let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(err, CanvasError::BufferSize { expected: 16, actual: 15 }));
    assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
    assert!(PixelBuffer::from_rgba(0, 5, Vec::new()).is_ok());
}

#[test]
fn pixel_accessors_are_row_major() {
    let data = (0..24).collect::<Vec<u8>>();
    let buf = PixelBuffer::from_rgba(3, 2, data).unwrap();
    assert_eq!(buf.pixel(0, 0), Some([0, 1, 2, 3]));
    assert_eq!(buf.pixel(2, 0), Some([8, 9, 10, 11]));
    assert_eq!(buf.pixel(0, 1), Some([12, 13, 14, 15]));
    assert_eq!(buf.pixel(3, 0), None);
    assert_eq!(buf.pixel(0, 2), None);
}

#[test]
fn set_pixel_ignores_out_of_bounds() {
    let mut buf = PixelBuffer::new(2, 2);
    buf.set_pixel(1, 1, [9, 8, 7, 6]);
    buf.set_pixel(5, 5, [1, 1, 1, 1]);
    assert_eq!(buf.pixel(1, 1), Some([9, 8, 7, 6]));
    assert_eq!(buf.data().iter().filter(|&&b| b != 0).count(), 4);
}
