//! PDF export through a stub Chrome binary

#[cfg(all(unix, feature = "native-export"))]
mod unix {
    use quire_babel::format::{Format, SerializedDocument};
    use quire_babel::formats::pdf::{ChromeRasterizer, PdfFormat, PrintLayout};
    use quire_babel::markup::{parse_with, ParserConfig};
    use quire_babel::FormatError;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::{tempdir, TempDir};

    /// A fake Chrome that reports a page height for `--dump-dom` and copies
    /// a prepared PNG for `--screenshot=`. Every invocation is logged.
    fn write_stub_chrome(png_width: u32, png_height: u32) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let png_path = dir.path().join("shot.png");
        image::RgbImage::from_pixel(png_width, png_height, image::Rgb([255, 255, 255]))
            .save_with_format(&png_path, image::ImageFormat::Png)
            .unwrap();

        let script_path = dir.path().join("fake-chrome.sh");
        let script = format!(
            r#"#!/bin/sh
echo "$@" >> "{log}"
for arg in "$@"; do
  case $arg in
    --dump-dom)
      echo '<html><head></head><body data-measured-height="1300"></body></html>'
      exit 0
      ;;
    --screenshot=*)
      cp "{png}" "${{arg#*=}}"
      exit 0
      ;;
  esac
done
echo "unexpected invocation" >&2
exit 1
"#,
            log = dir.path().join("calls.log").display(),
            png = png_path.display(),
        );
        fs::write(&script_path, script).unwrap();
        make_executable(&script_path);
        (dir, script_path)
    }

    fn write_failing_chrome() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let script_path = dir.path().join("broken-chrome.sh");
        fs::write(&script_path, "#!/bin/sh\nexit 3\n").unwrap();
        make_executable(&script_path);
        (dir, script_path)
    }

    fn make_executable(path: &Path) {
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    fn markup() -> quire_babel::SanitizedMarkup {
        parse_with("# Report\n\nParagraph in pdf test.", &ParserConfig::default()).unwrap()
    }

    #[test]
    fn pdf_renderer_uses_chrome_stub() {
        let (dir, chrome_stub) = write_stub_chrome(210, 600);
        let format = PdfFormat::with_rasterizer(ChromeRasterizer::new().with_binary(&chrome_stub));

        let result = format.serialize_markup(&markup()).unwrap();
        match result {
            SerializedDocument::Binary(bytes) => {
                assert!(bytes.starts_with(b"%PDF"));
                assert!(String::from_utf8_lossy(&bytes).contains("/Count 3"));
            }
            _ => panic!("Expected binary PDF output"),
        }

        let log = fs::read_to_string(dir.path().join("calls.log")).unwrap();
        let calls: Vec<_> = log.lines().collect();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("--dump-dom"));
        assert!(calls[0].contains("--headless"));
        assert!(calls[1].contains("--window-size=880,1300"));
        assert!(calls[1].contains("--force-device-scale-factor=2"));
        assert!(calls[1].contains("--hide-scrollbars"));
    }

    #[test]
    fn layout_changes_window_width() {
        let (dir, chrome_stub) = write_stub_chrome(210, 100);
        let layout = PrintLayout {
            content_width: 600,
            padding: 20,
            scale: 1.0,
        };
        let rasterizer = ChromeRasterizer::new()
            .with_binary(&chrome_stub)
            .with_layout(layout);
        let pdf = PdfFormat::with_rasterizer(rasterizer)
            .serialize_markup(&markup())
            .unwrap()
            .into_bytes();
        assert!(String::from_utf8_lossy(&pdf).contains("/Count 1"));

        let log = fs::read_to_string(dir.path().join("calls.log")).unwrap();
        assert!(log.contains("--window-size=640,1300"));
        assert!(log.contains("--force-device-scale-factor=1"));
    }

    #[test]
    fn failing_chrome_is_a_render_error() {
        let (_dir, chrome_stub) = write_failing_chrome();
        let format = PdfFormat::with_rasterizer(ChromeRasterizer::new().with_binary(&chrome_stub));
        assert!(matches!(
            format.serialize_markup(&markup()),
            Err(FormatError::RenderError(_))
        ));
    }
}

#[cfg(not(all(unix, feature = "native-export")))]
#[test]
fn pdf_stub_skipped() {
    eprintln!("Skipping PDF tests (native-export feature or Unix required)");
}
