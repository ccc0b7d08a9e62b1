//! Integration tests: fetch through libcurl against a local HTTP mirror and
//! `file://` object stores.

mod common;

use hashfetch_core::checksum::{Checksum, HashAlgorithm};
use hashfetch_core::sources::SourceSet;
use hashfetch_core::transport::CurlTransport;
use hashfetch_core::{FetchError, FetchOptions, Fetcher, Manifest, ManifestEntry};
use sha2::{Digest, Sha512};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn sha512_hex(body: &[u8]) -> String {
    hex::encode(Sha512::digest(body))
}

fn entry(body: &[u8], url: Option<String>, archive: bool) -> ManifestEntry {
    ManifestEntry {
        checksum: Checksum::new(HashAlgorithm::Sha512, &sha512_hex(body)).unwrap(),
        url,
        archive,
    }
}

fn one_entry(name: &str, e: ManifestEntry) -> Manifest {
    let mut map = BTreeMap::new();
    map.insert(name.to_string(), e);
    Manifest::from_entries(map)
}

fn mirror_templates(a: &common::mirror_server::MirrorServer, b: &common::mirror_server::MirrorServer) -> Vec<String> {
    vec![
        format!("{}/%(algo)/%(hash)", a.base),
        format!("{}/hashsum/%(algo_lower)/%(hash)/download", b.base),
    ]
}

const OPTS: FetchOptions = FetchOptions {
    verify: true,
    force: false,
};

#[test]
fn corrupt_first_mirror_falls_back_to_second() {
    let body: Vec<u8> = (0u8..200).cycle().take(48 * 1024).collect();
    let hash = sha512_hex(&body);
    let first = common::mirror_server::start(vec![(
        format!("SHA512/{}", hash),
        b"truncated".to_vec(),
    )]);
    let second = common::mirror_server::start(vec![(
        format!("hashsum/sha512/{}/download", hash),
        body.clone(),
    )]);

    let out = tempdir().unwrap();
    let sources = SourceSet {
        object_stores: Vec::new(),
        mirrors: mirror_templates(&first, &second),
    };
    let fetcher = Fetcher::new(
        one_entry("Data/volume.raw", entry(&body, None, false)),
        out.path(),
        sources,
        CurlTransport::default(),
    );

    let path = fetcher.fetch_one("Data/volume.raw", OPTS).expect("fetch_one");
    assert_eq!(fs::read(&path).unwrap(), body);
    assert!(!out.path().join("Data/volume.raw.part").exists());
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 1);

    // Cached and verified: no further requests.
    fetcher.fetch_one("Data/volume.raw", OPTS).expect("second fetch_one");
    assert_eq!(first.hits() + second.hits(), 2);
}

#[test]
fn object_store_is_tried_before_mirrors() {
    let body = b"pre-populated object store".to_vec();
    let hash = sha512_hex(&body);
    let store = tempdir().unwrap();
    fs::create_dir_all(store.path().join("SHA512")).unwrap();
    fs::write(store.path().join("SHA512").join(&hash), &body).unwrap();
    let mirror = common::mirror_server::start(Vec::new());

    let out = tempdir().unwrap();
    let sources = SourceSet {
        object_stores: vec![PathBuf::from("/nonexistent-store"), store.path().to_path_buf()],
        mirrors: mirror_templates(&mirror, &mirror),
    };
    let fetcher = Fetcher::new(
        one_entry("SimpleITK.jpg", entry(&body, None, false)),
        out.path(),
        sources,
        CurlTransport::default(),
    );

    let urls = fetcher.candidate_urls("SimpleITK.jpg").unwrap();
    assert_eq!(urls.len(), 4);
    assert!(urls[0].starts_with("file://") && urls[1].starts_with("file://"));
    assert!(urls[2].starts_with(&mirror.base));

    let path = fetcher.fetch_one("SimpleITK.jpg", OPTS).unwrap();
    assert_eq!(fs::read(path).unwrap(), body);
    assert_eq!(mirror.hits(), 0);
}

#[test]
fn gzipped_tar_archive_is_unpacked_over_http() {
    let scratch = tempdir().unwrap();
    let tgz = scratch.path().join("meta.tar.gz");
    {
        let file = fs::File::create(&tgz).unwrap();
        let gz = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(gz);
        for (name, data) in [("meta/00-P.mhd", &b"ElementDataFile = 00-P.raw"[..]), ("meta/00-P.raw", &b"\x00\x01\x02"[..])] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }
    let bytes = fs::read(&tgz).unwrap();
    let server = common::mirror_server::start(vec![("POPI/00-MetaImage.tar.gz".to_string(), bytes.clone())]);

    let out = tempdir().unwrap();
    let name = "POPI/meta/00-P.mhd";
    let fetcher = Fetcher::new(
        one_entry(name, entry(&bytes, Some(server.url("POPI/00-MetaImage.tar.gz")), true)),
        out.path(),
        SourceSet::default(),
        CurlTransport::default(),
    );

    let path = fetcher.fetch_one(name, OPTS).unwrap();
    assert_eq!(path, out.path().join(name));
    assert_eq!(
        fs::read(out.path().join("POPI/meta/meta/00-P.mhd")).unwrap(),
        b"ElementDataFile = 00-P.raw"
    );
    assert!(out.path().join("POPI/meta/meta/00-P.raw").exists());
    assert!(!out.path().join("POPI/meta/00-P.mhd.tmp").exists());
}

#[test]
fn explicit_url_returning_404_is_data_fetch_error() {
    let server = common::mirror_server::start(Vec::new());
    let url = server.url("gone.nrrd");
    let out = tempdir().unwrap();
    let fetcher = Fetcher::new(
        one_entry("gone.nrrd", entry(b"gone", Some(url.clone()), false)),
        out.path(),
        SourceSet {
            object_stores: Vec::new(),
            mirrors: vec![format!("{}/%(hash)", server.base)],
        },
        CurlTransport::default(),
    );

    match fetcher.fetch_one("gone.nrrd", OPTS) {
        Err(FetchError::DataFetch { urls, .. }) => assert_eq!(urls, vec![url]),
        other => panic!("expected DataFetch, got {:?}", other),
    }
    assert_eq!(server.hits(), 1);
    assert!(!out.path().join("gone.nrrd").exists());
}
