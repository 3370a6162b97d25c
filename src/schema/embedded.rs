//! Embedded stock schema sets.
//!
//! The system, core, cosine, inetorgperson and nis schema sets are embedded as
//! static JSON documents so a registry can be built without schema files on
//! disk. Each document names the sets it depends on.

/// Schema sets loaded when no explicit list is configured, in load order.
pub const DEFAULT_SCHEMAS: &[&str] = &["system", "core", "cosine", "inetorgperson", "nis"];

/// Look up an embedded schema set by name.
pub fn schema_set(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "system" => Some(system_schema()),
        "core" => Some(core_schema()),
        "cosine" => Some(cosine_schema()),
        "inetorgperson" => Some(inetorgperson_schema()),
        "nis" => Some(nis_schema()),
        _ => None,
    }
}

/// Returns the system schema: syntaxes, `top`, `alias`, `extensibleObject`
/// and the operational attributes maintained by the server.
pub fn system_schema() -> &'static str {
    r#"{
  "name": "system",
  "syntaxes": [
    { "oid": "1.3.6.1.4.1.1466.115.121.1.5", "description": "Binary", "humanReadable": false, "checker": "binary" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.7", "description": "Boolean", "checker": "boolean" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.11", "description": "Country String", "checker": "countryString" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.12", "description": "DN", "checker": "distinguishedName" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.15", "description": "Directory String", "checker": "directoryString" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.24", "description": "Generalized Time", "checker": "generalizedTime" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.26", "description": "IA5 String", "checker": "ia5String" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.27", "description": "INTEGER", "checker": "integer" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.28", "description": "JPEG", "humanReadable": false, "checker": "jpeg" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.36", "description": "Numeric String", "checker": "numericString" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.38", "description": "OID", "checker": "oid" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.40", "description": "Octet String", "humanReadable": false, "checker": "octetString" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.41", "description": "Postal Address", "checker": "postalAddress" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.44", "description": "Printable String", "checker": "printableString" },
    { "oid": "1.3.6.1.4.1.1466.115.121.1.50", "description": "Telephone Number", "checker": "telephoneNumber" },
    { "oid": "1.3.6.1.1.16.1", "description": "UUID", "checker": "uuid" }
  ],
  "attributeTypes": [
    {
      "oid": "2.5.4.0",
      "names": ["objectClass"],
      "description": "Object classes of the entry",
      "syntax": "1.3.6.1.4.1.1466.115.121.1.38",
      "equality": "objectIdentifierMatch"
    },
    {
      "oid": "2.5.4.1",
      "names": ["aliasedObjectName", "aliasedEntryName"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12",
      "equality": "distinguishedNameMatch",
      "singleValued": true
    },
    {
      "oid": "2.5.18.1",
      "names": ["createTimestamp"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.24",
      "equality": "generalizedTimeMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    },
    {
      "oid": "2.5.18.2",
      "names": ["modifyTimestamp"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.24",
      "equality": "generalizedTimeMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    },
    {
      "oid": "2.5.18.3",
      "names": ["creatorsName"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12",
      "equality": "distinguishedNameMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    },
    {
      "oid": "2.5.18.4",
      "names": ["modifiersName"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12",
      "equality": "distinguishedNameMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    },
    {
      "oid": "2.5.18.10",
      "names": ["subschemaSubentry"],
      "syntax": "1.3.6.1.4.1.1466.115.121.1.12",
      "equality": "distinguishedNameMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    },
    {
      "oid": "1.3.6.1.1.16.4",
      "names": ["entryUUID"],
      "syntax": "1.3.6.1.1.16.1",
      "equality": "uuidMatch",
      "singleValued": true,
      "usage": "directoryOperation",
      "userModifiable": false
    }
  ],
  "objectClasses": [
    {
      "oid": "2.5.6.0",
      "names": ["top"],
      "kind": "abstract",
      "must": ["objectClass"]
    },
    {
      "oid": "2.5.6.1",
      "names": ["alias"],
      "superiors": ["top"],
      "must": ["aliasedObjectName"]
    },
    {
      "oid": "1.3.6.1.4.1.1466.101.120.111",
      "names": ["extensibleObject"],
      "description": "RFC 4512: extensible object",
      "kind": "auxiliary",
      "superiors": ["top"]
    }
  ]
}"#
}

/// Returns the core schema (RFC 4519).
pub fn core_schema() -> &'static str {
    r#"{
  "name": "core",
  "dependencies": ["system"],
  "attributeTypes": [
    { "oid": "2.5.4.41", "names": ["name"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.3", "names": ["cn", "commonName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.4", "names": ["sn", "surname"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.5", "names": ["serialNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.44", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.6", "names": ["c", "countryName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.11", "equality": "caseIgnoreMatch", "singleValued": true },
    { "oid": "2.5.4.7", "names": ["l", "localityName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.7.1", "names": ["c-l"], "description": "RFC 3671: collective locality", "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch", "collective": true },
    { "oid": "2.5.4.8", "names": ["st", "stateOrProvinceName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.9", "names": ["street", "streetAddress"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.10", "names": ["o", "organizationName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.11", "names": ["ou", "organizationalUnitName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.12", "names": ["title"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.13", "names": ["description"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.16", "names": ["postalAddress"], "syntax": "1.3.6.1.4.1.1466.115.121.1.41", "equality": "caseIgnoreListMatch" },
    { "oid": "2.5.4.17", "names": ["postalCode"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.20", "names": ["telephoneNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.50", "equality": "telephoneNumberMatch" },
    { "oid": "2.5.4.23", "names": ["facsimileTelephoneNumber", "fax"], "syntax": "1.3.6.1.4.1.1466.115.121.1.50", "equality": "telephoneNumberMatch" },
    { "oid": "2.5.4.31", "names": ["member"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12", "equality": "distinguishedNameMatch" },
    { "oid": "2.5.4.32", "names": ["owner"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12", "equality": "distinguishedNameMatch" },
    { "oid": "2.5.4.33", "names": ["roleOccupant"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12", "equality": "distinguishedNameMatch" },
    { "oid": "2.5.4.34", "names": ["seeAlso"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12", "equality": "distinguishedNameMatch" },
    { "oid": "2.5.4.35", "names": ["userPassword"], "syntax": "1.3.6.1.4.1.1466.115.121.1.40", "equality": "octetStringMatch" },
    { "oid": "2.5.4.42", "names": ["givenName", "gn"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.43", "names": ["initials"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.5.4.50", "names": ["uniqueMember"], "syntax": "1.3.6.1.4.1.1466.115.121.1.12", "equality": "uniqueMemberMatch" },
    { "oid": "0.9.2342.19200300.100.1.1", "names": ["uid", "userid"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "0.9.2342.19200300.100.1.25", "names": ["dc", "domainComponent"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseIgnoreIA5Match", "singleValued": true }
  ],
  "objectClasses": [
    { "oid": "2.5.6.2", "names": ["country"], "superiors": ["top"], "must": ["c"], "may": ["description"] },
    { "oid": "2.5.6.3", "names": ["locality"], "superiors": ["top"], "may": ["street", "seeAlso", "st", "l", "description"] },
    {
      "oid": "2.5.6.4",
      "names": ["organization"],
      "superiors": ["top"],
      "must": ["o"],
      "may": ["userPassword", "seeAlso", "telephoneNumber", "facsimileTelephoneNumber", "street", "postalAddress", "postalCode", "st", "l", "description"]
    },
    {
      "oid": "2.5.6.5",
      "names": ["organizationalUnit"],
      "superiors": ["top"],
      "must": ["ou"],
      "may": ["userPassword", "seeAlso", "telephoneNumber", "facsimileTelephoneNumber", "street", "postalAddress", "postalCode", "st", "l", "description"]
    },
    {
      "oid": "2.5.6.6",
      "names": ["person"],
      "superiors": ["top"],
      "must": ["sn", "cn"],
      "may": ["userPassword", "telephoneNumber", "seeAlso", "description"]
    },
    {
      "oid": "2.5.6.7",
      "names": ["organizationalPerson"],
      "superiors": ["person"],
      "may": ["title", "ou", "l", "st", "street", "postalAddress", "postalCode", "telephoneNumber", "facsimileTelephoneNumber"]
    },
    {
      "oid": "2.5.6.8",
      "names": ["organizationalRole"],
      "superiors": ["top"],
      "must": ["cn"],
      "may": ["roleOccupant", "seeAlso", "telephoneNumber", "ou", "l", "st", "street", "description"]
    },
    {
      "oid": "2.5.6.9",
      "names": ["groupOfNames"],
      "superiors": ["top"],
      "must": ["member", "cn"],
      "may": ["owner", "seeAlso", "ou", "o", "description"]
    },
    {
      "oid": "2.5.6.10",
      "names": ["residentialPerson"],
      "superiors": ["person"],
      "must": ["l"],
      "may": ["street", "st", "postalAddress", "postalCode", "telephoneNumber"]
    },
    {
      "oid": "2.5.6.14",
      "names": ["device"],
      "superiors": ["top"],
      "must": ["cn"],
      "may": ["serialNumber", "seeAlso", "owner", "ou", "o", "l", "description"]
    },
    {
      "oid": "2.5.6.17",
      "names": ["groupOfUniqueNames"],
      "superiors": ["top"],
      "must": ["uniqueMember", "cn"],
      "may": ["owner", "seeAlso", "ou", "o", "description"]
    },
    { "oid": "1.3.6.1.4.1.1466.344", "names": ["dcObject"], "kind": "auxiliary", "superiors": ["top"], "must": ["dc"] },
    { "oid": "1.3.6.1.1.3.1", "names": ["uidObject"], "kind": "auxiliary", "superiors": ["top"], "must": ["uid"] }
  ]
}"#
}

/// Returns the cosine schema (RFC 4524 subset).
pub fn cosine_schema() -> &'static str {
    r#"{
  "name": "cosine",
  "dependencies": ["core"],
  "attributeTypes": [
    { "oid": "0.9.2342.19200300.100.1.3", "names": ["mail", "rfc822Mailbox"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseIgnoreIA5Match" },
    { "oid": "0.9.2342.19200300.100.1.9", "names": ["host"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "0.9.2342.19200300.100.1.41", "names": ["mobile", "mobileTelephoneNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.50", "equality": "telephoneNumberMatch" },
    { "oid": "0.9.2342.19200300.100.1.60", "names": ["jpegPhoto"], "syntax": "1.3.6.1.4.1.1466.115.121.1.28" }
  ],
  "objectClasses": [
    {
      "oid": "0.9.2342.19200300.100.4.5",
      "names": ["account"],
      "superiors": ["top"],
      "must": ["uid"],
      "may": ["description", "seeAlso", "l", "o", "ou", "host"]
    },
    {
      "oid": "0.9.2342.19200300.100.4.13",
      "names": ["domain"],
      "superiors": ["top"],
      "must": ["dc"],
      "may": ["userPassword", "seeAlso", "telephoneNumber", "street", "postalAddress", "postalCode", "st", "l", "o", "description"]
    }
  ]
}"#
}

/// Returns the inetOrgPerson schema (RFC 2798).
pub fn inetorgperson_schema() -> &'static str {
    r#"{
  "name": "inetorgperson",
  "dependencies": ["core", "cosine"],
  "attributeTypes": [
    { "oid": "2.16.840.1.113730.3.1.1", "names": ["carLicense"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.16.840.1.113730.3.1.2", "names": ["departmentNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.16.840.1.113730.3.1.3", "names": ["employeeNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch", "singleValued": true },
    { "oid": "2.16.840.1.113730.3.1.4", "names": ["employeeType"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch" },
    { "oid": "2.16.840.1.113730.3.1.39", "names": ["preferredLanguage"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch", "singleValued": true },
    { "oid": "2.16.840.1.113730.3.1.241", "names": ["displayName"], "syntax": "1.3.6.1.4.1.1466.115.121.1.15", "equality": "caseIgnoreMatch", "singleValued": true }
  ],
  "objectClasses": [
    {
      "oid": "2.16.840.1.113730.3.2.2",
      "names": ["inetOrgPerson"],
      "superiors": ["organizationalPerson"],
      "may": [
        "carLicense", "departmentNumber", "displayName", "employeeNumber", "employeeType",
        "givenName", "initials", "jpegPhoto", "mail", "mobile", "o", "preferredLanguage", "uid"
      ]
    }
  ]
}"#
}

/// Returns the NIS schema (RFC 2307 subset).
pub fn nis_schema() -> &'static str {
    r#"{
  "name": "nis",
  "dependencies": ["core"],
  "attributeTypes": [
    { "oid": "1.3.6.1.1.1.1.0", "names": ["uidNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.27", "equality": "integerMatch", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.1", "names": ["gidNumber"], "syntax": "1.3.6.1.4.1.1466.115.121.1.27", "equality": "integerMatch", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.2", "names": ["gecos"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseIgnoreIA5Match", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.3", "names": ["homeDirectory"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseExactIA5Match", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.4", "names": ["loginShell"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseExactIA5Match", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.5", "names": ["shadowLastChange"], "syntax": "1.3.6.1.4.1.1466.115.121.1.27", "equality": "integerMatch", "singleValued": true },
    { "oid": "1.3.6.1.1.1.1.12", "names": ["memberUid"], "syntax": "1.3.6.1.4.1.1466.115.121.1.26", "equality": "caseExactIA5Match" }
  ],
  "objectClasses": [
    {
      "oid": "1.3.6.1.1.1.2.0",
      "names": ["posixAccount"],
      "kind": "auxiliary",
      "superiors": ["top"],
      "must": ["cn", "uid", "uidNumber", "gidNumber", "homeDirectory"],
      "may": ["userPassword", "loginShell", "gecos", "description"]
    },
    {
      "oid": "1.3.6.1.1.1.2.1",
      "names": ["shadowAccount"],
      "kind": "auxiliary",
      "superiors": ["top"],
      "must": ["uid"],
      "may": ["userPassword", "shadowLastChange", "description"]
    },
    {
      "oid": "1.3.6.1.1.1.2.2",
      "names": ["posixGroup"],
      "superiors": ["top"],
      "must": ["cn", "gidNumber"],
      "may": ["userPassword", "memberUid", "description"]
    }
  ]
}"#
}
