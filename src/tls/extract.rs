//! Certificate extraction utilities.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::x509::{AttributeTypeAndValue, X509Name};

use super::CertName;

/// Subject Alternative Names of a certificate, split by type.
#[derive(Debug, Default)]
pub(crate) struct SubjectAltNames {
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

/// Extracts DNS, email and IP Subject Alternative Names.
///
/// Other general name types are ignored. IP entries with an unexpected
/// length are skipped.
pub(crate) fn extract_certificate_sans(cert: &X509Certificate<'_>) -> SubjectAltNames {
    let mut sans = SubjectAltNames::default();

    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(ref san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                match general_name {
                    GeneralName::DNSName(name) => sans.dns_names.push(name.to_string()),
                    GeneralName::RFC822Name(email) => {
                        sans.email_addresses.push(email.to_string())
                    }
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = ip_from_bytes(bytes) {
                            sans.ip_addresses.push(ip);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    sans
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// Reduces an X.509 distinguished name to its commonly displayed attributes.
///
/// Multi-valued attributes are joined with ", ".
pub(crate) fn extract_name(name: &X509Name<'_>) -> CertName {
    fn join<'a, 'b: 'a>(values: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>) -> String {
        values
            .filter_map(|attr| attr.as_str().ok())
            .collect::<Vec<_>>()
            .join(", ")
    }

    CertName {
        country: join(name.iter_country()),
        organization: join(name.iter_organization()),
        locality: join(name.iter_locality()),
        province: join(name.iter_state_or_province()),
        common_name: join(name.iter_common_name()),
    }
}
