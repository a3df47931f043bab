//! # certmodel - An X.509 Extension and Name Model
//!
//! certmodel gives the common X.509 v3 extensions and name forms a typed, mutable
//! model on top of the rustcrypto `x509-cert` structures. Every model value converts
//! to and from its native DER structure and renders a deterministic, tab-indented
//! XML text used for inspection and comparison.
//!
//! ## Supported Extensions
//!
//! - **Basic Constraints**, **Key Usage**, **Extended Key Usage**
//! - **Subject/Authority Key Identifier**
//! - **Subject/Issuer Alternative Name**
//! - **CRL Distribution Points**, **CRL Number**, **Delta CRL Indicator**
//! - **Certificate Policies**, **Authority Information Access**
//!
//! Extensions without a typed model are kept as raw values so nothing is lost
//! when a certificate is inspected.
//!
//! ## Quick Start
//!
//! ### Building an Extension
//!
//! ```rust
//! use certmodel::cert::extensions::{Extension, SubjectAlternativeName};
//! use certmodel::name::GeneralName;
//!
//! # fn main() -> Result<(), certmodel::error::CertificationError> {
//! let mut dns = GeneralName::new();
//! dns.set_dns_name("www.example.com");
//!
//! let mut san = SubjectAlternativeName::new();
//! san.add_general_name(dns);
//!
//! let native = san.to_x509_extension()?;
//! let decoded = SubjectAlternativeName::from_x509_extension(&native)?;
//! assert_eq!(decoded, san);
//! println!("{}", decoded.xml_encoded(""));
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting a Certificate
//!
//! ```rust,no_run
//! use certmodel::cert::{Certificate, extensions::BasicConstraints};
//!
//! # fn main() -> Result<(), certmodel::error::CertificationError> {
//! let pem = std::fs::read_to_string("cert.pem").unwrap_or_default();
//! let certificate = Certificate::from_pem(&pem)?;
//!
//! if let Some(constraints) = certificate.extension::<BasicConstraints>()? {
//!     println!("ca: {}", constraints.is_ca());
//! }
//! println!("{}", certificate.xml_encoded("")?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Registering an Object Identifier
//!
//! ```rust
//! use certmodel::oid::{OidRegistry, ObjectIdentifierFactory};
//!
//! # fn main() -> Result<(), certmodel::error::CertificationError> {
//! let registry = OidRegistry::new();
//! let cnpj = registry.create_object_identifier("2.16.76.1.3.3", "CNPJ")?;
//! assert_eq!(cnpj.name(), "CNPJ");
//!
//! let cn = ObjectIdentifierFactory::get_object_identifier("CN")?;
//! assert_eq!(cn.oid()?, "2.5.4.3");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`error::CertificationError`]:
//!
//! ```rust
//! use certmodel::{cert::Certificate, error::CertificationError};
//!
//! match Certificate::from_pem("invalid pem data") {
//!     Ok(_) => println!("Certificate parsed"),
//!     Err(CertificationError::DecodingError(msg)) => println!("Failed to decode: {}", msg),
//!     Err(CertificationError::InvalidInput(msg)) => println!("Invalid input: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`oid`]: Object identifiers and the name/number registry
//! - [`name`]: Distinguished names and general names
//! - [`cert`]: Extensions, policies, distribution points and the certificate/CRL wrappers
//! - [`pem_utils`]: PEM armor helpers
//! - [`error`]: The crate error type

pub mod cert;
pub mod error;
pub mod name;
pub mod oid;
pub mod pem_utils;
mod xml;
