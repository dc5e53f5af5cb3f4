/// Identifier tag for a DER encoded integer.
/// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
pub(crate) const DER_TAG_INTEGER: u8 = 0x02;

/// Identifier tag for a DER encoded sequence.
/// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
pub(crate) const DER_TAG_SEQUENCE: u8 = 0x30;

/// Maximum length of a DER encoded length in short form.
/// Defined in [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
pub(crate) const DER_LENGTH_SHORT_FORM_MAX: usize = 127;

/// High bit of a big-endian octet. A set sign bit in the leading octet of a
/// DER INTEGER would flip the value negative, so a zero octet is prepended.
pub(crate) const INTEGER_SIGN_BIT_MASK: u8 = 0x80;

/// Leading octet of an uncompressed SEC1 elliptic curve point.
/// Defined in section 2.3.3 of [SEC1](https://www.secg.org/sec1-v2.pdf).
pub(crate) const SEC1_UNCOMPRESSED_POINT: u8 = 0x04;
