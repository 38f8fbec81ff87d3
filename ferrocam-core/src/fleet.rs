use ferrocam_model::{Camera, Ident, ImageFormat, QualityRange, Resolution};

/// Built-in three camera fleet served when no device list is configured.
///
/// Mirrors the development fleet of the web UI: a front, back and side
/// camera with two or three RGB/YUV capture modes each.
pub fn demo_fleet() -> Vec<Camera> {
    vec![
        Camera {
            index: Ident::Number(0),
            name: Some("Front Camera".to_string()),
            src: String::new(),
            current_frame_rate: 30.0,
            current_image_format: Ident::Number(1),
            current_image_format_description: None,
            current_quality: Some(85),
            current_resolution: Resolution::new(640, 480),
            image_formats: vec![
                ImageFormat::new(1u64, "RGB 5-6-5 640x480")
                    .with_quality(QualityRange::new(50, 100, 5, 85)),
                ImageFormat::new(2u64, "RGB 8-8-8 640x480")
                    .with_quality(QualityRange::new(80, 100, 1, 95)),
            ],
        },
        Camera {
            index: Ident::Number(1),
            name: Some("Back Camera".to_string()),
            src: String::new(),
            current_frame_rate: 25.0,
            current_image_format: Ident::Number(1),
            current_image_format_description: None,
            current_quality: Some(90),
            current_resolution: Resolution::new(1920, 1080),
            image_formats: vec![
                ImageFormat::new(1u64, "RGB 5-6-5 1920x1080")
                    .with_quality(QualityRange::new(50, 100, 5, 90)),
                ImageFormat::new(2u64, "RGB 8-8-8 1920x1080")
                    .with_quality(QualityRange::new(80, 100, 1, 95)),
                ImageFormat::new(3u64, "RGB 8-8-8 1080x720")
                    .with_quality(QualityRange::new(60, 100, 10, 80)),
            ],
        },
        Camera {
            index: Ident::Number(2),
            name: Some("Side Camera".to_string()),
            src: String::new(),
            current_frame_rate: 15.0,
            current_image_format: Ident::Number(2),
            current_image_format_description: None,
            current_quality: Some(95),
            current_resolution: Resolution::new(800, 600),
            image_formats: vec![
                ImageFormat::new(1u64, "RGB 8-8-8 800x600")
                    .with_quality(QualityRange::new(50, 100, 5, 85)),
                ImageFormat::new(2u64, "YUV 4-2-2 800x600")
                    .with_quality(QualityRange::new(80, 100, 1, 95)),
            ],
        },
    ]
}
