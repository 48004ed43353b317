//! Decodes bucket, region and endpoint from the host of an `s3://` URL.
//!
//! S3-compatible providers encode the bucket and region in a provider-specific
//! host name. Any host that is not recognised is taken to be an AWS bucket name.

use regex::Regex;

lazy_static::lazy_static! {
    static ref LOCALHOST: Regex = Regex::new(r"^(?:(.+)\.)?localhost$").unwrap();
    static ref BACKBLAZE: Regex = Regex::new(r"^(?:(.+)\.)?s3\.([^.]+)\.backblazeb2\.com$").unwrap();
    static ref FILEBASE: Regex = Regex::new(r"^(?:(.+)\.)?s3\.filebase\.com$").unwrap();
    static ref DIGITAL_OCEAN: Regex = Regex::new(r"^(?:(.+)\.)?([^.]+)\.digitaloceanspaces\.com$").unwrap();
    static ref LINODE: Regex = Regex::new(r"^(?:(.+)\.)?([^.]+)\.linodeobjects\.com$").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Host {
    pub bucket: String,
    pub region: String,
    pub endpoint: String,
    pub force_path_style: bool,
}

pub fn parse_host(s: &str) -> S3Host {
    let (host, port) = split_host_port(s);

    let capture = |re: &Regex, i: usize| -> Option<String> {
        re.captures(host)
            .map(|caps| caps.get(i).map_or("", |m| m.as_str()).to_string())
    };

    let mut scheme = "https";
    let (bucket, region, endpoint) = if let Some(bucket) = capture(&LOCALHOST, 1) {
        scheme = "http";
        (bucket, "us-east-1".to_string(), "localhost".to_string())
    } else if let Some(bucket) = capture(&BACKBLAZE, 1) {
        let region = capture(&BACKBLAZE, 2).unwrap_or_default();
        let endpoint = format!("s3.{}.backblazeb2.com", region);
        (bucket, region, endpoint)
    } else if let Some(bucket) = capture(&FILEBASE, 1) {
        (bucket, String::new(), "s3.filebase.com".to_string())
    } else if let Some(bucket) = capture(&DIGITAL_OCEAN, 1) {
        let region = capture(&DIGITAL_OCEAN, 2).unwrap_or_default();
        let endpoint = format!("{}.digitaloceanspaces.com", region);
        (bucket, region, endpoint)
    } else if let Some(bucket) = capture(&LINODE, 1) {
        let region = capture(&LINODE, 2).unwrap_or_default();
        let endpoint = format!("{}.linodeobjects.com", region);
        (bucket, region, endpoint)
    } else {
        return S3Host {
            bucket: host.to_string(),
            ..Default::default()
        };
    };

    let endpoint = match port {
        Some(port) => format!("{}://{}:{}", scheme, endpoint, port),
        None => format!("{}://{}", scheme, endpoint),
    };

    S3Host {
        bucket,
        region,
        endpoint,
        force_path_style: true,
    }
}

/// Splits `host:port`. Returns the input unchanged when there is no port.
fn split_host_port(s: &str) -> (&str, Option<&str>) {
    if let Some((host, port)) = s.rsplit_once(':') {
        let bracketed = host.starts_with('[') && host.ends_with(']');
        if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && (bracketed || !host.contains(':')) {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            return (host, Some(port));
        }
    }
    (s, None)
}
