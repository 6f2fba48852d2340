//! Runtime-support module (`_proto_types.py`).
//!
//! Generated modules import 64-bit integer wrappers, timestamp and duration
//! adapters and validator factories from a sibling `_proto_types.py`. One
//! such module is written per output directory and contains only the
//! optional helpers that the directory's modules reference.

use std::collections::BTreeSet;
use std::fmt;

/// A symbol defined in `_proto_types.py`.
///
/// Variants are declared in the byte order of their Python names so that the
/// derived ordering sorts import lists the same way a string sort would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportSymbol {
    ProtoDuration,
    ProtoInt64,
    ProtoTimestamp,
    ProtoUInt64,
    MakeConstValidator,
    MakeInValidator,
    MakeNotInValidator,
    RequireFinite,
    RequireUnique,
    ValidateEmail,
    ValidateIp,
    ValidateIpv4,
    ValidateIpv6,
    ValidateUri,
    ValidateUuid,
}

impl SupportSymbol {
    pub fn name(self) -> &'static str {
        match self {
            SupportSymbol::ProtoDuration => "ProtoDuration",
            SupportSymbol::ProtoInt64 => "ProtoInt64",
            SupportSymbol::ProtoTimestamp => "ProtoTimestamp",
            SupportSymbol::ProtoUInt64 => "ProtoUInt64",
            SupportSymbol::MakeConstValidator => "_make_const_validator",
            SupportSymbol::MakeInValidator => "_make_in_validator",
            SupportSymbol::MakeNotInValidator => "_make_not_in_validator",
            SupportSymbol::RequireFinite => "_require_finite",
            SupportSymbol::RequireUnique => "_require_unique",
            SupportSymbol::ValidateEmail => "_validate_email",
            SupportSymbol::ValidateIp => "_validate_ip",
            SupportSymbol::ValidateIpv4 => "_validate_ipv4",
            SupportSymbol::ValidateIpv6 => "_validate_ipv6",
            SupportSymbol::ValidateUri => "_validate_uri",
            SupportSymbol::ValidateUuid => "_validate_uuid",
        }
    }
}

impl fmt::Display for SupportSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const HEADER: &str = "# DO NOT EDIT. Generated by protoc-gen-pydantic.\n";

// Each body opens with two newlines so that appending it after a line ending
// in "\n" leaves exactly two blank lines before the definition.
const BASE_FUNCS: &str = r#"

def _coerce_int(v):
    return int(v)


ProtoInt64 = _Annotated[
    int,
    _BeforeValidator(_coerce_int),
    _PlainSerializer(lambda v: str(v), return_type=str, when_used="json"),
]

ProtoUInt64 = _Annotated[
    int,
    _BeforeValidator(_coerce_int),
    _PlainSerializer(lambda v: str(v), return_type=str, when_used="json"),
]


def _parse_timestamp(v):
    if isinstance(v, str):
        return _datetime.datetime.fromisoformat(v.replace("Z", "+00:00"))
    if isinstance(v, _datetime.datetime):
        return v
    raise ValueError(f"Cannot parse timestamp from {type(v)}")


def _serialize_timestamp(v):
    if v.tzinfo is None:
        v = v.replace(tzinfo=_datetime.timezone.utc)
    s = v.strftime("%Y-%m-%dT%H:%M:%S")
    us = v.microsecond
    if us:
        s += f".{us:06d}".rstrip("0")
    return s + "Z"


ProtoTimestamp = _Annotated[
    _datetime.datetime,
    _BeforeValidator(_parse_timestamp),
    _PlainSerializer(_serialize_timestamp, return_type=str, when_used="json"),
]


def _parse_duration(v):
    if isinstance(v, str):
        m = _re.match(r"^(-?\d+(?:\.\d+)?)s$", v)
        if not m:
            raise ValueError(f"Invalid duration: {v}")
        return _datetime.timedelta(seconds=float(m.group(1)))
    if isinstance(v, _datetime.timedelta):
        return v
    raise ValueError(f"Cannot parse duration from {type(v)}")


def _serialize_duration(v):
    total = v.total_seconds()
    if total == int(total):
        return f"{int(total)}s"
    return f"{total}s"


ProtoDuration = _Annotated[
    _datetime.timedelta,
    _BeforeValidator(_parse_duration),
    _PlainSerializer(_serialize_duration, return_type=str, when_used="json"),
]


def _require_unique(v):
    if len(v) != len(set(v)):
        raise ValueError("list items must be unique")
    return v


def _make_in_validator(valid_values):
    def _validate(v):
        if v not in valid_values:
            raise ValueError(f"value must be one of {sorted(valid_values)}")
        return v

    return _validate


def _make_not_in_validator(excluded_values):
    def _validate(v):
        if v in excluded_values:
            raise ValueError(f"value must not be one of {sorted(excluded_values)}")
        return v

    return _validate
"#;

const EMAIL_FUNC: &str = r#"

def _validate_email(v: str) -> str:
    if not v:
        return v
    from pydantic.networks import validate_email as _pydantic_validate_email

    _pydantic_validate_email(v)
    return v
"#;

const URI_FUNC: &str = r#"

def _validate_uri(v: str) -> str:
    if not v:
        return v
    _url_adapter.validate_python(v)
    return v
"#;

const IP_FUNC: &str = r#"

def _validate_ip(v: str) -> str:
    if not v:
        return v
    _ipaddress.ip_address(v)
    return v
"#;

const IPV4_FUNC: &str = r#"

def _validate_ipv4(v: str) -> str:
    if not v:
        return v
    _ipaddress.IPv4Address(v)
    return v
"#;

const IPV6_FUNC: &str = r#"

def _validate_ipv6(v: str) -> str:
    if not v:
        return v
    _ipaddress.IPv6Address(v)
    return v
"#;

const UUID_FUNC: &str = r#"

def _validate_uuid(v: str) -> str:
    if not v:
        return v
    _uuid_lib.UUID(v)
    return v
"#;

const FINITE_FUNC: &str = r#"

def _require_finite(v: float) -> float:
    if not _math.isfinite(v):
        raise ValueError("value must be finite")
    return v
"#;

const CONST_VALIDATOR_FUNC: &str = r#"

def _make_const_validator(c):
    def _validate(v):
        if v != c:
            raise ValueError(f"value must equal {c!r}")
        return v

    return _validate
"#;

/// Build the content of `_proto_types.py` for one output directory.
///
/// The 64-bit, timestamp, duration, uniqueness and membership helpers are
/// always present. Format, finiteness and float-constant helpers (and the
/// imports they need) are included only when listed in `needed`.
pub fn build_support_module(needed: &BTreeSet<SupportSymbol>) -> String {
    let has = |symbol: SupportSymbol| needed.contains(&symbol);
    let need_ip = has(SupportSymbol::ValidateIp)
        || has(SupportSymbol::ValidateIpv4)
        || has(SupportSymbol::ValidateIpv6);
    let need_uri = has(SupportSymbol::ValidateUri);

    let mut code = String::from(HEADER);

    code.push_str("import datetime as _datetime\n");
    if need_ip {
        code.push_str("import ipaddress as _ipaddress\n");
    }
    if has(SupportSymbol::RequireFinite) {
        code.push_str("import math as _math\n");
    }
    code.push_str("import re as _re\n");
    if has(SupportSymbol::ValidateUuid) {
        code.push_str("import uuid as _uuid_lib\n");
    }
    code.push_str("from typing import Annotated as _Annotated\n");
    code.push('\n');

    if need_uri {
        code.push_str("from pydantic import AnyUrl as _AnyUrl\n");
    }
    code.push_str("from pydantic import BeforeValidator as _BeforeValidator\n");
    code.push_str("from pydantic import PlainSerializer as _PlainSerializer\n");
    if need_uri {
        code.push_str("from pydantic import TypeAdapter as _TypeAdapter\n");
        code.push_str("\n_url_adapter = _TypeAdapter(_AnyUrl)\n");
    }

    code.push_str(BASE_FUNCS);

    let optional = [
        (SupportSymbol::ValidateEmail, EMAIL_FUNC),
        (SupportSymbol::ValidateUri, URI_FUNC),
        (SupportSymbol::ValidateIp, IP_FUNC),
        (SupportSymbol::ValidateIpv4, IPV4_FUNC),
        (SupportSymbol::ValidateIpv6, IPV6_FUNC),
        (SupportSymbol::ValidateUuid, UUID_FUNC),
        (SupportSymbol::RequireFinite, FINITE_FUNC),
        (SupportSymbol::MakeConstValidator, CONST_VALIDATOR_FUNC),
    ];
    for (symbol, body) in optional {
        if has(symbol) {
            code.push_str(body);
        }
    }

    let trimmed_len = code.trim_end_matches('\n').len();
    code.truncate(trimmed_len);
    code.push('\n');
    code
}
