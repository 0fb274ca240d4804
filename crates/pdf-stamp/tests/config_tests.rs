use pdf_stamp::*;
use std::path::Path;
use tempfile::TempDir;

fn write_signature_png(path: &Path) {
    let mut img = image::RgbaImage::new(200, 100);
    for (x, _y, pixel) in img.enumerate_pixels_mut() {
        *pixel = if x < 150 {
            image::Rgba([0, 0, 255, 200])
        } else {
            image::Rgba([0, 0, 0, 0])
        };
    }
    img.save(path).unwrap();
}

fn valid_options(dir: &TempDir) -> StampOptions {
    let signature_path = dir.path().join("sig.png");
    write_signature_png(&signature_path);
    StampOptions {
        signature_path,
        ..Default::default()
    }
}

#[test]
fn test_valid_options_build() {
    let dir = TempDir::new().unwrap();
    let config = StampConfig::from_options(&valid_options(&dir)).unwrap();

    assert_eq!(config.scale(), 0.3);
    assert_eq!(config.opacity(), 1.0);
    // Margins are stored in points (0.5 in = 36 pt)
    assert_eq!(config.x_offset_pt(), 36.0);
    assert_eq!(config.y_offset_pt(), 36.0);
    assert_eq!(config.image().dimensions(), (200, 100));
}

#[test]
fn test_scale_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut options = valid_options(&dir);
    options.scale = 1.5;
    match StampConfig::from_options(&options) {
        Err(StampError::Config(msg)) => assert!(msg.contains("Scale")),
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }

    options.scale = 0.05;
    assert!(StampConfig::from_options(&options).is_err());
}

#[test]
fn test_opacity_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut options = valid_options(&dir);
    options.opacity = 2.0;
    assert!(StampConfig::from_options(&options).is_err());

    options.opacity = 0.0;
    assert!(StampConfig::from_options(&options).is_err());
}

#[test]
fn test_rotation_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut options = valid_options(&dir);
    options.rotation_degrees = 400.0;
    assert!(StampConfig::from_options(&options).is_err());

    options.rotation_degrees = -10.0;
    assert!(StampConfig::from_options(&options).is_err());

    options.rotation_degrees = 360.0;
    assert!(StampConfig::from_options(&options).is_ok());
}

#[test]
fn test_margins_out_of_range() {
    let dir = TempDir::new().unwrap();
    let mut options = valid_options(&dir);
    options.x_offset_in = 2.5;
    assert!(StampConfig::from_options(&options).is_err());

    let mut options = valid_options(&dir);
    options.y_offset_in = 0.05;
    assert!(StampConfig::from_options(&options).is_err());
}

#[test]
fn test_malformed_page_expression() {
    let dir = TempDir::new().unwrap();
    let mut options = valid_options(&dir);
    options.pages = "1;3".to_string();
    assert!(StampConfig::from_options(&options).is_err());

    let mut options = valid_options(&dir);
    options.skip_pages = "nope".to_string();
    assert!(StampConfig::from_options(&options).is_err());
}

#[test]
fn test_missing_signature_image() {
    let dir = TempDir::new().unwrap();
    let options = StampOptions {
        signature_path: dir.path().join("missing.png"),
        ..Default::default()
    };
    match StampConfig::from_options(&options) {
        Err(StampError::Config(msg)) => assert!(msg.contains("not found")),
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_non_png_signature_rejected() {
    let dir = TempDir::new().unwrap();
    let jpeg_path = dir.path().join("sig.jpg");
    let img = image::RgbImage::new(50, 20);
    img.save(&jpeg_path).unwrap();

    let options = StampOptions {
        signature_path: jpeg_path,
        ..Default::default()
    };
    match StampConfig::from_options(&options) {
        Err(StampError::Config(msg)) => assert!(msg.contains("PNG")),
        other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
    }
}
