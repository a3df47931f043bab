//! Object identifiers and the registry that gives them ids and names.
//!
//! An [`ObjectIdentifier`] pairs a dotted identifier with the registry id and
//! short name it resolved to. Resolution goes through an [`OidRegistry`]; the
//! process-wide one is reached through [`OidRegistry::global`] or the
//! [`ObjectIdentifierFactory`] facade.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use const_oid::ObjectIdentifier as Asn1Oid;
use const_oid::db::{rfc3280, rfc4519, rfc5280, rfc5912, rfc8410};
use log::debug;

use crate::error::{CertificationError, Result};
use crate::xml;

/// Name reported by identifiers with no registry entry.
pub const UNDEFINED: &str = "undefined";

/// First id handed out by [`OidRegistry::create_object_identifier`].
pub const FIRST_DYNAMIC_NID: i32 = 10000;

/// Built-in entries: identifier, id, short name, long name.
///
/// Ids and names follow the OpenSSL object table so XML output matches tools
/// built on it.
const BUILTIN: &[(Asn1Oid, i32, &str, &str)] = &[
    // X.520 attribute types
    (rfc4519::C, 14, "C", "countryName"),
    (rfc4519::CN, 13, "CN", "commonName"),
    (rfc4519::L, 15, "L", "localityName"),
    (rfc4519::ST, 16, "ST", "stateOrProvinceName"),
    (rfc4519::O, 17, "O", "organizationName"),
    (rfc4519::OU, 18, "OU", "organizationalUnitName"),
    (rfc3280::EMAIL_ADDRESS, 48, "emailAddress", "emailAddress"),
    (rfc4519::DN_QUALIFIER, 174, "dnQualifier", "dnQualifier"),
    (rfc4519::SERIAL_NUMBER, 105, "serialNumber", "serialNumber"),
    (rfc4519::TITLE, 106, "title", "title"),
    (rfc4519::SN, 100, "SN", "surname"),
    (rfc4519::GIVEN_NAME, 99, "GN", "givenName"),
    (rfc4519::INITIALS, 101, "initials", "initials"),
    (rfc3280::PSEUDONYM, 510, "pseudonym", "pseudonym"),
    (
        rfc4519::GENERATION_QUALIFIER,
        509,
        "generationQualifier",
        "generationQualifier",
    ),
    (rfc4519::DC, 391, "DC", "domainComponent"),
    // certificate and CRL extensions
    (
        rfc5280::ID_CE_SUBJECT_KEY_IDENTIFIER,
        82,
        "subjectKeyIdentifier",
        "X509v3 Subject Key Identifier",
    ),
    (rfc5280::ID_CE_KEY_USAGE, 83, "keyUsage", "X509v3 Key Usage"),
    (
        rfc5280::ID_CE_SUBJECT_ALT_NAME,
        85,
        "subjectAltName",
        "X509v3 Subject Alternative Name",
    ),
    (
        rfc5280::ID_CE_ISSUER_ALT_NAME,
        86,
        "issuerAltName",
        "X509v3 Issuer Alternative Name",
    ),
    (
        rfc5280::ID_CE_BASIC_CONSTRAINTS,
        87,
        "basicConstraints",
        "X509v3 Basic Constraints",
    ),
    (rfc5280::ID_CE_CRL_NUMBER, 88, "crlNumber", "X509v3 CRL Number"),
    (
        rfc5280::ID_CE_DELTA_CRL_INDICATOR,
        140,
        "deltaCRL",
        "X509v3 Delta CRL Indicator",
    ),
    (
        rfc5280::ID_CE_CRL_DISTRIBUTION_POINTS,
        103,
        "crlDistributionPoints",
        "X509v3 CRL Distribution Points",
    ),
    (
        rfc5280::ID_CE_CERTIFICATE_POLICIES,
        89,
        "certificatePolicies",
        "X509v3 Certificate Policies",
    ),
    (
        rfc5280::ID_CE_AUTHORITY_KEY_IDENTIFIER,
        90,
        "authorityKeyIdentifier",
        "X509v3 Authority Key Identifier",
    ),
    (
        rfc5280::ID_CE_EXT_KEY_USAGE,
        126,
        "extendedKeyUsage",
        "X509v3 Extended Key Usage",
    ),
    (
        rfc5280::ID_PE_AUTHORITY_INFO_ACCESS,
        177,
        "authorityInfoAccess",
        "Authority Information Access",
    ),
    (
        rfc5280::ID_PE_SUBJECT_INFO_ACCESS,
        398,
        "subjectInfoAccess",
        "Subject Information Access",
    ),
    (rfc5280::ANY_POLICY, 746, "anyPolicy", "X509v3 Any Policy"),
    // policy qualifiers
    (rfc5280::ID_QT_CPS, 164, "id-qt-cps", "Policy Qualifier CPS"),
    (
        rfc5280::ID_QT_UNOTICE,
        165,
        "id-qt-unotice",
        "Policy Qualifier User Notice",
    ),
    // key purposes
    (
        rfc5280::ID_KP_SERVER_AUTH,
        129,
        "serverAuth",
        "TLS Web Server Authentication",
    ),
    (
        rfc5280::ID_KP_CLIENT_AUTH,
        130,
        "clientAuth",
        "TLS Web Client Authentication",
    ),
    (rfc5280::ID_KP_CODE_SIGNING, 131, "codeSigning", "Code Signing"),
    (
        rfc5280::ID_KP_EMAIL_PROTECTION,
        132,
        "emailProtection",
        "E-mail Protection",
    ),
    (rfc5280::ID_KP_TIME_STAMPING, 133, "timeStamping", "Time Stamping"),
    (rfc5280::ID_KP_OCSP_SIGNING, 180, "OCSPSigning", "OCSP Signing"),
    // access methods
    (rfc5280::ID_AD_OCSP, 178, "OCSP", "OCSP"),
    (rfc5280::ID_AD_CA_ISSUERS, 179, "caIssuers", "CA Issuers"),
    // algorithms commonly found next to extensions
    (rfc5912::RSA_ENCRYPTION, 6, "rsaEncryption", "rsaEncryption"),
    (
        rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        668,
        "RSA-SHA256",
        "sha256WithRSAEncryption",
    ),
    (
        rfc5912::ID_EC_PUBLIC_KEY,
        408,
        "id-ecPublicKey",
        "id-ecPublicKey",
    ),
    (
        rfc5912::ECDSA_WITH_SHA_256,
        794,
        "ecdsa-with-SHA256",
        "ecdsa-with-SHA256",
    ),
    (rfc8410::ID_ED_25519, 1087, "ED25519", "ED25519"),
    (rfc5912::ID_SHA_1, 64, "SHA1", "sha1"),
    (rfc5912::ID_SHA_256, 672, "SHA256", "sha256"),
];

/// An object identifier together with what the registry knows about it.
///
/// The default value is the undefined identifier: [`ObjectIdentifier::oid`]
/// fails on it, while [`ObjectIdentifier::nid`] and [`ObjectIdentifier::name`]
/// report the `None` / [`UNDEFINED`] sentinels.
///
/// # Fields
/// * `oid` - The dotted identifier, if any.
/// * `nid` - The registry id, when the identifier is registered.
/// * `name` - The registry short name, when the identifier is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    oid: Option<Asn1Oid>,
    nid: Option<i32>,
    name: Option<String>,
}

impl ObjectIdentifier {
    /// Creates the undefined identifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a native identifier against the process-wide registry.
    pub fn from_x509_oid(oid: Asn1Oid) -> Self {
        OidRegistry::global().resolve(oid)
    }

    /// Returns the native identifier.
    ///
    /// # Returns
    /// The identifier, or `UndefinedObjectIdentifier` when none is held.
    pub fn to_x509_oid(&self) -> Result<Asn1Oid> {
        self.oid.ok_or(CertificationError::UndefinedObjectIdentifier)
    }

    /// Returns the dotted-decimal form, failing when the identifier is undefined.
    pub fn oid(&self) -> Result<String> {
        self.to_x509_oid().map(|oid| oid.to_string())
    }

    /// Returns the registry id, `None` when unregistered or undefined.
    pub fn nid(&self) -> Option<i32> {
        self.nid
    }

    /// Returns the registry short name, or [`UNDEFINED`].
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNDEFINED)
    }

    /// The short name when registered, otherwise the dotted form, otherwise [`UNDEFINED`].
    pub fn display_name(&self) -> String {
        match (&self.name, self.oid) {
            (Some(name), _) => name.clone(),
            (None, Some(oid)) => oid.to_string(),
            (None, None) => UNDEFINED.to_string(),
        }
    }

    /// Whether a dotted identifier is held.
    pub fn is_defined(&self) -> bool {
        self.oid.is_some()
    }

    /// Renders `{tab}<oid>{dotted}</oid>`, with an empty body when undefined.
    pub fn xml_encoded(&self, tab: &str) -> String {
        let dotted = self.oid.map(|oid| oid.to_string()).unwrap_or_default();
        xml::element(tab, "oid", dotted)
    }
}

impl From<Asn1Oid> for ObjectIdentifier {
    fn from(oid: Asn1Oid) -> Self {
        Self::from_x509_oid(oid)
    }
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    oid: Asn1Oid,
    nid: i32,
    short_name: String,
    long_name: String,
}

#[derive(Debug)]
struct RegistryTables {
    entries: Vec<RegistryEntry>,
    by_oid: HashMap<Asn1Oid, usize>,
    by_nid: HashMap<i32, usize>,
    by_name: HashMap<String, usize>,
    next_nid: i32,
}

impl RegistryTables {
    fn with_builtins() -> Self {
        let mut tables = Self {
            entries: Vec::with_capacity(BUILTIN.len()),
            by_oid: HashMap::new(),
            by_nid: HashMap::new(),
            by_name: HashMap::new(),
            next_nid: FIRST_DYNAMIC_NID,
        };
        for (oid, nid, short_name, long_name) in BUILTIN {
            tables.insert(RegistryEntry {
                oid: *oid,
                nid: *nid,
                short_name: short_name.to_string(),
                long_name: long_name.to_string(),
            });
        }
        tables
    }

    fn insert(&mut self, entry: RegistryEntry) {
        let index = self.entries.len();
        self.by_oid.insert(entry.oid, index);
        self.by_nid.insert(entry.nid, index);
        self.by_name.entry(entry.short_name.clone()).or_insert(index);
        self.by_name.entry(entry.long_name.clone()).or_insert(index);
        self.entries.push(entry);
    }

    fn identifier(&self, index: usize) -> ObjectIdentifier {
        let entry = &self.entries[index];
        ObjectIdentifier {
            oid: Some(entry.oid),
            nid: Some(entry.nid),
            name: Some(entry.short_name.clone()),
        }
    }
}

/// Registry mapping identifiers to ids and names.
///
/// Lookups take a shared lock and registration an exclusive one, so a
/// registry can be shared between threads as is. The tables are only ever
/// appended to, so a poisoned lock still guards consistent data and is
/// recovered rather than reported.
#[derive(Debug)]
pub struct OidRegistry {
    tables: RwLock<RegistryTables>,
}

impl Default for OidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OidRegistry {
    /// Creates a registry holding the built-in entries only.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(RegistryTables::with_builtins()),
        }
    }

    /// The process-wide registry used by conversions from native structures.
    pub fn global() -> &'static OidRegistry {
        static GLOBAL: OnceLock<OidRegistry> = OnceLock::new();
        GLOBAL.get_or_init(OidRegistry::new)
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves a native identifier; unregistered identifiers keep the dotted
    /// form but carry no id or name.
    pub fn resolve(&self, oid: Asn1Oid) -> ObjectIdentifier {
        let tables = self.read();
        match tables.by_oid.get(&oid) {
            Some(index) => tables.identifier(*index),
            None => ObjectIdentifier {
                oid: Some(oid),
                nid: None,
                name: None,
            },
        }
    }

    /// Looks up an identifier by dotted form or by registered name.
    ///
    /// # Arguments
    /// * `text` - A dotted identifier such as `2.5.4.3`, or a short or long name such as `CN`.
    ///
    /// # Returns
    /// The resolved identifier, or `InvalidObjectIdentifier` when `text` is neither.
    pub fn get_object_identifier(&self, text: &str) -> Result<ObjectIdentifier> {
        if let Ok(oid) = Asn1Oid::new(text) {
            return Ok(self.resolve(oid));
        }
        let tables = self.read();
        tables
            .by_name
            .get(text)
            .map(|index| tables.identifier(*index))
            .ok_or_else(|| CertificationError::InvalidObjectIdentifier(text.to_string()))
    }

    /// Looks up an identifier by registry id.
    pub fn get_object_identifier_by_nid(&self, nid: i32) -> Result<ObjectIdentifier> {
        let tables = self.read();
        tables
            .by_nid
            .get(&nid)
            .map(|index| tables.identifier(*index))
            .ok_or(CertificationError::UnknownNid(nid))
    }

    /// Registers a new identifier under `name` and returns it with a fresh id.
    ///
    /// # Arguments
    /// * `dotted` - The dotted identifier to register.
    /// * `name` - The short and long name to give it.
    ///
    /// # Returns
    /// The registered identifier, or `AlreadyRegistered` when either the
    /// identifier or the name is already known.
    pub fn create_object_identifier(&self, dotted: &str, name: &str) -> Result<ObjectIdentifier> {
        let oid = Asn1Oid::new(dotted)
            .map_err(|_| CertificationError::InvalidObjectIdentifier(dotted.to_string()))?;
        if name.is_empty() {
            return Err(CertificationError::InvalidInput(format!(
                "empty name for object identifier {dotted}"
            )));
        }

        let mut tables = self.write();
        if tables.by_oid.contains_key(&oid) {
            return Err(CertificationError::AlreadyRegistered(dotted.to_string()));
        }
        if tables.by_name.contains_key(name) {
            return Err(CertificationError::AlreadyRegistered(name.to_string()));
        }

        let nid = tables.next_nid;
        tables.next_nid += 1;
        tables.insert(RegistryEntry {
            oid,
            nid,
            short_name: name.to_string(),
            long_name: name.to_string(),
        });
        debug!("registered object identifier {dotted} as {name} (id {nid})");

        Ok(ObjectIdentifier {
            oid: Some(oid),
            nid: Some(nid),
            name: Some(name.to_string()),
        })
    }
}

/// Lookup-or-create access to the process-wide [`OidRegistry`].
pub struct ObjectIdentifierFactory;

impl ObjectIdentifierFactory {
    /// See [`OidRegistry::get_object_identifier`].
    pub fn get_object_identifier(text: &str) -> Result<ObjectIdentifier> {
        OidRegistry::global().get_object_identifier(text)
    }

    /// See [`OidRegistry::get_object_identifier_by_nid`].
    pub fn get_object_identifier_by_nid(nid: i32) -> Result<ObjectIdentifier> {
        OidRegistry::global().get_object_identifier_by_nid(nid)
    }

    /// See [`OidRegistry::create_object_identifier`]. The entry lives for the
    /// rest of the process.
    pub fn create_object_identifier(dotted: &str, name: &str) -> Result<ObjectIdentifier> {
        OidRegistry::global().create_object_identifier(dotted, name)
    }
}
