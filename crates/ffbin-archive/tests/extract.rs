use std::io::Write;
use std::path::{Path, PathBuf};

use ffbin_archive::{ArchiveFormat, ExtractError, Layout, extract};
use ffbin_platform::{Arch, Platform, SystemIdentity};

const LINUX: SystemIdentity = SystemIdentity::new(Platform::Linux, Arch::X64);
const WINDOWS: SystemIdentity = SystemIdentity::new(Platform::Windows, Arch::X64);

fn tar_xz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (path, data) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn tar_places_binaries_flat() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(
        scratch.path(),
        "temp-1.tar.xz",
        &tar_xz(&[
            ("ffmpeg-master-latest-linux64-gpl/LICENSE.txt", b"gpl"),
            ("ffmpeg-master-latest-linux64-gpl/bin/ffmpeg", b"ffmpeg-bin"),
            ("ffmpeg-master-latest-linux64-gpl/bin/ffprobe", b"ffprobe-bin"),
            ("ffmpeg-master-latest-linux64-gpl/bin/ffplay", b"ffplay-bin"),
            ("ffmpeg-master-latest-linux64-gpl/man/man1/ffmpeg.1", b"man"),
        ]),
    );

    let report = extract(&archive, target.path(), &Layout::for_identity(&LINUX).unwrap()).unwrap();

    assert_eq!(report.format, ArchiveFormat::TarXz);
    assert_eq!(report.entries_scanned, 5);
    assert_eq!(report.placed.len(), 2);
    assert_eq!(names_in(target.path()), ["ffmpeg", "ffprobe"]);
    assert_eq!(std::fs::read(target.path().join("ffmpeg")).unwrap(), b"ffmpeg-bin");
}

#[test]
fn tar_at_wrong_depth_is_an_error() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(
        scratch.path(),
        "temp-2.tar.xz",
        &tar_xz(&[
            ("outer/ffmpeg-master-latest-linux64-gpl/bin/ffmpeg", b"x"),
            ("outer/ffmpeg-master-latest-linux64-gpl/bin/ffprobe", b"y"),
        ]),
    );

    let err = extract(&archive, target.path(), &Layout::for_identity(&LINUX).unwrap()).unwrap_err();

    assert!(matches!(err, ExtractError::NoMatchingEntries));
    assert!(names_in(target.path()).is_empty());
}

#[test]
fn tar_missing_probe_is_an_error() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(
        scratch.path(),
        "temp-3.tar.xz",
        &tar_xz(&[("release/bin/ffmpeg", b"x")]),
    );

    let err = extract(&archive, target.path(), &Layout::for_identity(&LINUX).unwrap()).unwrap_err();

    match err {
        ExtractError::MissingEntries { missing } => assert_eq!(missing, ["ffprobe"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(names_in(target.path()).is_empty());
}

#[test]
fn garbage_tar_is_corrupted() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(scratch.path(), "temp-4.tar.xz", b"definitely not xz");

    let err = extract(&archive, target.path(), &Layout::for_identity(&LINUX).unwrap()).unwrap_err();

    assert!(matches!(err, ExtractError::Corrupted(_)));
    assert!(names_in(target.path()).is_empty());
}

#[test]
fn zip_relocates_from_any_depth() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(
        scratch.path(),
        "temp-5.zip",
        &zip(&[
            ("ffmpeg-master-latest-win64-gpl/LICENSE.txt", b"gpl"),
            ("ffmpeg-master-latest-win64-gpl/bin/ffmpeg.exe", b"ffmpeg-exe"),
            ("ffmpeg-master-latest-win64-gpl/bin/ffprobe.exe", b"ffprobe-exe"),
            ("ffmpeg-master-latest-win64-gpl/bin/ffplay.exe", b"ffplay-exe"),
            ("ffmpeg-master-latest-win64-gpl/doc/ffmpeg.html", b"doc"),
        ]),
    );

    let report = extract(&archive, target.path(), &Layout::for_identity(&WINDOWS).unwrap()).unwrap();

    assert_eq!(report.format, ArchiveFormat::Zip);
    assert_eq!(report.entries_scanned, 5);
    assert_eq!(names_in(target.path()), ["ffmpeg.exe", "ffplay.exe", "ffprobe.exe"]);
    assert_eq!(std::fs::read(target.path().join("ffplay.exe")).unwrap(), b"ffplay-exe");
}

#[test]
fn zip_overwrites_previous_install() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    std::fs::write(target.path().join("ffmpeg.exe"), b"stale").unwrap();
    let archive = write_archive(
        scratch.path(),
        "temp-6.zip",
        &zip(&[
            ("release/bin/ffmpeg.exe", b"fresh"),
            ("release/bin/ffprobe.exe", b"fresh-probe"),
        ]),
    );

    extract(&archive, target.path(), &Layout::for_identity(&WINDOWS).unwrap()).unwrap();

    assert_eq!(std::fs::read(target.path().join("ffmpeg.exe")).unwrap(), b"fresh");
    assert_eq!(names_in(target.path()), ["ffmpeg.exe", "ffprobe.exe"]);
}

#[test]
fn zip_without_binaries_is_an_error() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(scratch.path(), "temp-7.zip", &zip(&[("README.txt", b"hi")]));

    let err = extract(&archive, target.path(), &Layout::for_identity(&WINDOWS).unwrap()).unwrap_err();

    assert!(matches!(err, ExtractError::NoMatchingEntries));
    assert!(names_in(target.path()).is_empty());
}

#[test]
fn garbage_zip_is_corrupted() {
    let scratch = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let archive = write_archive(scratch.path(), "temp-8.zip", &[0xDE, 0xAD, 0xBE, 0xEF]);

    let err = extract(&archive, target.path(), &Layout::for_identity(&WINDOWS).unwrap()).unwrap_err();

    assert!(matches!(err, ExtractError::Corrupted(_)));
}
