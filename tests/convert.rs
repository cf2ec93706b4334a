//! End-to-end conversions over real clip directories.

use std::fs;
use std::path::Path;

use haar_format::error::Error;
use haar_format::{ClipPattern, Converter, ConverterConfig, Summary};
use tempfile::TempDir;

/// `<root>/images` holds the originals, `<root>/images/imageclipper` the clips.
fn layout(originals: &[&str], clips: &[&str]) -> anyhow::Result<TempDir> {
    let root = tempfile::tempdir()?;
    let images = root.path().join("images");
    let clip_dir = images.join("imageclipper");
    fs::create_dir_all(&clip_dir)?;

    for name in originals {
        fs::write(images.join(name), b"")?;
    }
    for name in clips {
        fs::write(clip_dir.join(name), b"")?;
    }

    Ok(root)
}

fn config(root: &Path) -> ConverterConfig {
    let images = root.join("images");

    ConverterConfig {
        path_prefix: images.clone(),
        ..ConverterConfig::new(images.join("imageclipper"))
    }
}

fn run(config: ConverterConfig) -> (Result<Summary, Error>, String) {
    let mut out = Vec::new();
    let result = Converter::new(config).run(&mut out);

    (result, String::from_utf8(out).unwrap())
}

fn line(root: &Path, basename: &str, rest: &str) -> String {
    format!("{} {}\n", root.join("images").join(basename).display(), rest)
}

#[test]
fn emits_clip_of_existing_image() -> anyhow::Result<()> {
    let root = layout(&["cat.png"], &["cat.png_0001_0010_0020_0030_0040.png"])?;

    let (result, out) = run(config(root.path()));
    let summary = result?;

    assert_eq!(out, line(root.path(), "cat.png", "1 10 20 30 40"));
    assert_eq!(summary.emitted, 1);
    assert_eq!(summary.parsed, 1);
    Ok(())
}

#[test]
fn skips_clip_of_missing_image() -> anyhow::Result<()> {
    let root = layout(&[], &["cat.png_0001_0010_0020_0030_0040.png"])?;

    let (result, out) = run(config(root.path()));
    let summary = result?;

    assert!(out.is_empty());
    assert_eq!(summary.missing, 1);
    assert_eq!(summary.emitted, 0);
    Ok(())
}

#[test]
fn clamps_negative_coordinates() -> anyhow::Result<()> {
    let root = layout(&["cat.png"], &["cat.png_0001_-0005_0020_0030_0040.png"])?;

    let (result, out) = run(config(root.path()));
    result?;

    assert_eq!(out, line(root.path(), "cat.png", "1 0 20 30 40"));
    Ok(())
}

#[test]
fn ignores_subdirectories() -> anyhow::Result<()> {
    let root = layout(&["cat.png"], &["cat.png_0001_0010_0020_0030_0040.png"])?;
    fs::create_dir(root.path().join("images/imageclipper/imageclipper"))?;

    let (result, out) = run(config(root.path()));
    let summary = result?;

    assert_eq!(out, line(root.path(), "cat.png", "1 10 20 30 40"));
    assert_eq!(summary.skipped_dirs, 1);
    assert_eq!(summary.listed, 2);
    Ok(())
}

#[test]
fn stops_at_first_malformed_name() -> anyhow::Result<()> {
    let root = layout(
        &["a.png", "c.png"],
        &[
            "a.png_0001_0001_0002_0003_0004.png",
            "b_no_coordinates.png",
            "c.png_0001_0005_0006_0007_0008.png",
        ],
    )?;

    let (result, out) = run(config(root.path()));

    match result {
        Err(Error::Format { file, .. }) => assert_eq!(file, "b_no_coordinates.png"),
        other => panic!("expected format error, got {:?}", other),
    }
    assert_eq!(out, line(root.path(), "a.png", "1 1 2 3 4"));
    Ok(())
}

#[test]
fn keep_going_skips_malformed_names() -> anyhow::Result<()> {
    let root = layout(
        &["a.png", "c.png"],
        &[
            "a.png_0001_0001_0002_0003_0004.png",
            "b_no_coordinates.png",
            "c.png_0001_0005_0006_0007_0008.png",
        ],
    )?;

    let (result, out) = run(ConverterConfig {
        keep_going: true,
        ..config(root.path())
    });
    let summary = result?;

    let expected = line(root.path(), "a.png", "1 1 2 3 4") + &line(root.path(), "c.png", "1 5 6 7 8");
    assert_eq!(out, expected);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.emitted, 2);
    Ok(())
}

#[test]
fn groups_clips_by_original() -> anyhow::Result<()> {
    let root = layout(
        &["cat.png"],
        &[
            "cat.png_0000_0001_0002_0003_0004.png",
            "cat.png_0000_0010_0020_0030_0040.png",
        ],
    )?;

    let (result, out) = run(ConverterConfig {
        group: true,
        ..config(root.path())
    });
    let summary = result?;

    assert_eq!(out, line(root.path(), "cat.png", "2 1 2 3 4 10 20 30 40"));
    assert_eq!(summary.emitted, 1);
    Ok(())
}

#[test]
fn grouped_run_keeps_groups_before_failure() -> anyhow::Result<()> {
    let root = layout(
        &["a.png"],
        &["a.png_0_1_2_3_4.png", "b.txt", "c.png_0_1_2_3_4.png"],
    )?;

    let (result, out) = run(ConverterConfig {
        group: true,
        ..config(root.path())
    });

    assert!(matches!(result, Err(Error::Format { .. })));
    assert_eq!(out, line(root.path(), "a.png", "1 1 2 3 4"));
    Ok(())
}

#[test]
fn video_clip_names() -> anyhow::Result<()> {
    let root = layout(&["cat.avi"], &["cat.avi_0012_0000_0010_0020_0030_0040.png"])?;

    let (result, out) = run(ConverterConfig {
        pattern: ClipPattern::from_format("video")?,
        ..config(root.path())
    });
    result?;

    assert_eq!(out, line(root.path(), "cat.avi", "1 10 20 30 40"));
    Ok(())
}

#[test]
fn missing_clip_directory() {
    let root = tempfile::tempdir().unwrap();

    let (result, out) = run(ConverterConfig::new(root.path().join("absent")));

    assert!(matches!(result, Err(Error::MissingDirectory { .. })));
    assert!(out.is_empty());
}

// macOS filesystems refuse names that are not UTF-8
#[cfg(target_os = "linux")]
mod raw_names {
    use super::*;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    fn layout_raw(originals: &[&[u8]], clips: &[&[u8]]) -> anyhow::Result<TempDir> {
        let root = layout(&[], &[])?;
        let images = root.path().join("images");

        for name in originals {
            fs::write(images.join(OsStr::from_bytes(name)), b"")?;
        }
        for name in clips {
            fs::write(images.join("imageclipper").join(OsStr::from_bytes(name)), b"")?;
        }

        Ok(root)
    }

    fn run_raw(config: ConverterConfig) -> (Result<Summary, Error>, Vec<u8>) {
        let mut out = Vec::new();
        let result = Converter::new(config).run(&mut out);

        (result, out)
    }

    #[test]
    fn non_utf8_clip_is_emitted_verbatim() -> anyhow::Result<()> {
        let root = layout_raw(&[b"caf\xe9.png"], &[b"caf\xe9.png_1_2_3_4_5.png"])?;

        let (result, out) = run_raw(config(root.path()));
        let summary = result?;

        let mut expected = root.path().join("images").as_os_str().as_bytes().to_vec();
        expected.extend_from_slice(b"/caf\xe9.png 1 2 3 4 5\n");
        assert_eq!(out, expected);
        assert_eq!(summary.emitted, 1);
        Ok(())
    }

    #[test]
    fn malformed_non_utf8_clip_stops_the_run() -> anyhow::Result<()> {
        let root = layout_raw(
            &[b"a.png", b"d.png"],
            &[b"a.png_0_1_2_3_4.png", b"caf\xe9_bad.png", b"d.png_0_5_6_7_8.png"],
        )?;

        let (result, out) = run_raw(config(root.path()));

        match result {
            Err(Error::Format { file, .. }) => assert_eq!(file, "caf\u{fffd}_bad.png"),
            other => panic!("expected format error, got {:?}", other),
        }
        assert_eq!(String::from_utf8(out)?, line(root.path(), "a.png", "1 1 2 3 4"));
        Ok(())
    }
}
