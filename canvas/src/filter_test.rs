use super::*;

/// Build a buffer whose R, G and B all carry `values[i]`, with alpha `alpha[i]`.
fn gray_buffer(width: u32, height: u32, values: &[u8], alpha: &[u8]) -> PixelBuffer {
    let data = values
        .iter()
        .zip(alpha)
        .flat_map(|(&v, &a)| [v, v, v, a])
        .collect();
    PixelBuffer::from_rgba(width, height, data).unwrap()
}

fn red_channel(buf: &PixelBuffer) -> Vec<u8> {
    buf.data().chunks_exact(4).map(|px| px[0]).collect()
}

// =============================================================
// Grayscale / invert
// =============================================================

#[test]
fn invert_single_pixel() {
    let mut buf = PixelBuffer::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
    invert(&mut buf);
    assert_eq!(buf.data(), &[245, 235, 225, 255]);
}

#[test]
fn grayscale_single_pixel() {
    let mut buf = PixelBuffer::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
    grayscale(&mut buf);
    assert_eq!(buf.data(), &[20, 20, 20, 255]);
}

#[test]
fn grayscale_rounds_to_nearest() {
    let mut buf = PixelBuffer::from_rgba(2, 1, vec![0, 0, 1, 255, 0, 1, 1, 255]).unwrap();
    grayscale(&mut buf);
    assert_eq!(buf.data(), &[0, 0, 0, 255, 1, 1, 1, 255]);
}

#[test]
fn invert_twice_is_identity() {
    let original = PixelBuffer::from_rgba(2, 1, vec![10, 20, 30, 255, 0, 128, 255, 7]).unwrap();
    let twice = Filter::Invert.apply(&Filter::Invert.apply(&original));
    assert_eq!(twice, original);
}

#[test]
fn grayscale_twice_equals_once_but_differs_from_source() {
    let original = PixelBuffer::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
    let once = Filter::Grayscale.apply(&original);
    let twice = Filter::Grayscale.apply(&once);
    assert_eq!(once, twice);
    assert_ne!(twice, original);
}

#[test]
fn grayscale_and_invert_orderings_on_opaque_pixel() {
    let original = PixelBuffer::from_rgba(1, 1, vec![10, 20, 30, 255]).unwrap();
    let gray_then_invert = Filter::Invert.apply(&Filter::Grayscale.apply(&original));
    let invert_then_gray = Filter::Grayscale.apply(&Filter::Invert.apply(&original));
    assert_eq!(gray_then_invert.data(), &[235, 235, 235, 255]);
    assert_eq!(invert_then_gray.data(), &[235, 235, 235, 255]);
}

#[test]
fn per_pixel_filters_leave_alpha_alone() {
    let original = PixelBuffer::from_rgba(2, 1, vec![1, 2, 3, 0, 4, 5, 6, 99]).unwrap();
    for filter in [Filter::Grayscale, Filter::Invert] {
        let out = filter.apply(&original);
        assert_eq!(out.pixel(0, 0).map(|p| p[3]), Some(0), "{filter}");
        assert_eq!(out.pixel(1, 0).map(|p| p[3]), Some(99), "{filter}");
    }
}

// =============================================================
// Convolution
// =============================================================

#[test]
fn sharpen_matches_hand_computed_3x3() {
    let src = gray_buffer(3, 3, &[10, 20, 30, 40, 50, 60, 70, 80, 90], &[255; 9]);
    let out = convolve(&src, &SHARPEN);

    // Interior: 5*50 - 20 - 40 - 60 - 80.
    assert_eq!(out.pixel(1, 1), Some([50, 50, 50, 255]));

    // Edges and corners use replicated edge neighbours, clamped to [0, 255].
    assert_eq!(red_channel(&out), vec![0, 0, 10, 30, 50, 70, 90, 110, 130]);
}

#[test]
fn sharpen_uses_all_three_color_channels_independently() {
    let mut data = Vec::new();
    for i in 0..9_u8 {
        data.extend_from_slice(&[i * 10, 100, 255 - i * 10, 255]);
    }
    let src = PixelBuffer::from_rgba(3, 3, data).unwrap();
    let out = convolve(&src, &SHARPEN);
    let center = out.pixel(1, 1).unwrap();
    // R: 5*40 - 10 - 30 - 50 - 70; G: uniform; B: 5*215 - 245 - 225 - 205 - 185.
    assert_eq!(center, [40, 100, 215, 255]);
}

#[test]
fn sharpen_clamps_to_byte_range() {
    let mut values = [0_u8; 9];
    values[4] = 100;
    let src = gray_buffer(3, 3, &values, &[255; 9]);
    let out = convolve(&src, &SHARPEN);
    assert_eq!(out.pixel(1, 1), Some([255, 255, 255, 255]));
    // Orthogonal neighbours of the bright center go negative.
    assert_eq!(out.pixel(1, 0), Some([0, 0, 0, 255]));
    // Corners never see the center (corner weights are 0).
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn sharpen_copies_alpha_from_same_offset() {
    let alpha = [0, 10, 20, 30, 40, 50, 60, 70, 80];
    let src = gray_buffer(3, 3, &[128; 9], &alpha);
    let out = convolve(&src, &SHARPEN);
    let out_alpha: Vec<u8> = out.data().chunks_exact(4).map(|px| px[3]).collect();
    assert_eq!(out_alpha, alpha);
}

#[test]
fn sharpen_leaves_uniform_image_unchanged() {
    let src = gray_buffer(4, 2, &[200; 8], &[255; 8]);
    assert_eq!(convolve(&src, &SHARPEN), src);
}

#[test]
fn sharpen_single_pixel_is_identity() {
    // Every neighbour clamps to the pixel itself: 5v - 4v = v.
    let src = PixelBuffer::from_rgba(1, 1, vec![12, 34, 56, 78]).unwrap();
    assert_eq!(convolve(&src, &SHARPEN), src);
}

#[test]
fn convolve_empty_buffer() {
    let src = PixelBuffer::new(0, 0);
    assert_eq!(convolve(&src, &SHARPEN).data().len(), 0);
}

#[test]
fn convolve_is_deterministic() {
    let src = gray_buffer(3, 3, &[9, 200, 31, 77, 5, 250, 0, 128, 64], &[255; 9]);
    assert_eq!(convolve(&src, &SHARPEN), convolve(&src, &SHARPEN));
}

#[test]
fn identity_kernel_returns_source() {
    let identity: Kernel = [[0, 0, 0], [0, 1, 0], [0, 0, 0]];
    let src = gray_buffer(3, 3, &[9, 200, 31, 77, 5, 250, 0, 128, 64], &[1; 9]);
    assert_eq!(convolve(&src, &identity), src);
}

// =============================================================
// Names
// =============================================================

#[test]
fn filter_names_parse() {
    assert_eq!("grayscale".parse::<Filter>().unwrap(), Filter::Grayscale);
    assert_eq!("invert".parse::<Filter>().unwrap(), Filter::Invert);
    assert_eq!("sharpen".parse::<Filter>().unwrap(), Filter::Sharpen);
    assert_eq!("enhance".parse::<Filter>().unwrap(), Filter::Sharpen);
}

#[test]
fn unknown_filter_is_reported() {
    let err = "sepia".parse::<Filter>().unwrap_err();
    assert!(matches!(err, CanvasError::UnknownFilter(ref name) if name == "sepia"));
}
