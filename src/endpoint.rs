//! Endpoint Table
//!
//! Each backend route is described once: how its parameters are encoded in
//! the URL, how its response wraps the option list, and whether failures are
//! swallowed or handed back to the caller. The two response envelopes are
//! deliberately not unified.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

use crate::error::LoadError;
use crate::models::OptionEntry;

/// Field wrapping the option list in enveloped responses
pub const DATA_FIELD: &str = "dados";

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in query keys and values (`application/x-www-form-urlencoded`)
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');

/// Known backend routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/fetch_empresas_socnet/{main}/{all}`
    EmpresasSocnet,
    /// `/fetch_empresas/{main}/{all}`
    Empresas,
    /// `/fetch_empresas_v2?cod_empresa_principal=&status_empresas=`
    EmpresasV2,
    /// `/fetch_unidades/{main}/{company}`
    Unidades,
    /// `/fetch_unidades_public/{main}/{company}`
    UnidadesPublic,
    /// `/fetch_exames/{main}`
    Exames,
    /// `/fetch_prestadores/{main}/{all}`
    Prestadores,
    /// Any route answering a query string with a bare array
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStyle {
    /// Values appended as `/v1/v2/...` in parameter order; keys are dropped.
    PathSegments,
    /// Values sent as `?k1=v1&k2=v2`.
    QueryString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Body is the option array itself.
    Bare,
    /// Body is an object holding the option array under the named field.
    Wrapped(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Malformed or unexpected payloads are returned to the caller.
    /// Transport failures are still logged and swallowed.
    Propagate,
    /// Every failure is logged once and the target is left untouched.
    LogAndKeep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub route: String,
    pub style: UrlStyle,
    pub shape: ResponseShape,
    pub policy: ErrorPolicy,
    /// Insert the synthetic "Empty" option (value `0`) after the placeholder.
    pub empty_option: bool,
}

impl EndpointSpec {
    fn enveloped(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            style: UrlStyle::PathSegments,
            shape: ResponseShape::Wrapped(DATA_FIELD),
            policy: ErrorPolicy::Propagate,
            empty_option: false,
        }
    }

    fn bare_query(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            style: UrlStyle::QueryString,
            shape: ResponseShape::Bare,
            policy: ErrorPolicy::LogAndKeep,
            empty_option: false,
        }
    }

    fn with_empty_option(mut self) -> Self {
        self.empty_option = true;
        self
    }

    /// Full request URL for `query`, encoded according to this route's style.
    pub fn url(&self, base_url: &str, query: &Query) -> String {
        let base = base_url.trim_end_matches('/');
        match self.style {
            UrlStyle::PathSegments => {
                let mut url = format!("{}{}", base, self.route);
                for (_, value) in query.pairs() {
                    url.push('/');
                    url.extend(utf8_percent_encode(value.as_param(), PATH_SEGMENT));
                }
                url
            }
            UrlStyle::QueryString => format!("{}{}?{}", base, self.route, query.encode()),
        }
    }
}

impl Endpoint {
    pub fn spec(&self) -> EndpointSpec {
        match self {
            Endpoint::EmpresasSocnet => EndpointSpec::enveloped("/fetch_empresas_socnet"),
            Endpoint::Empresas => EndpointSpec::enveloped("/fetch_empresas"),
            Endpoint::EmpresasV2 => EndpointSpec::bare_query("/fetch_empresas_v2"),
            Endpoint::Unidades => EndpointSpec::enveloped("/fetch_unidades"),
            Endpoint::UnidadesPublic => EndpointSpec::enveloped("/fetch_unidades_public"),
            Endpoint::Exames => EndpointSpec::enveloped("/fetch_exames"),
            Endpoint::Prestadores => EndpointSpec::enveloped("/fetch_prestadores").with_empty_option(),
            Endpoint::Custom(route) => EndpointSpec::bare_query(route.clone()),
        }
    }
}

impl ResponseShape {
    /// Pull the option entries out of a parsed body.
    pub fn extract(&self, body: serde_json::Value) -> Result<Vec<OptionEntry>, LoadError> {
        match self {
            ResponseShape::Bare => Ok(serde_json::from_value(body)?),
            ResponseShape::Wrapped(field) => match body {
                serde_json::Value::Object(mut map) => {
                    let inner = map
                        .remove(*field)
                        .ok_or_else(|| LoadError::MissingField(field.to_string()))?;
                    Ok(serde_json::from_value(inner)?)
                }
                _ => Err(LoadError::MissingField(field.to_string())),
            },
        }
    }
}

/// A query parameter value. Absent values are still sent, as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Value(String),
    Absent,
}

impl QueryValue {
    fn as_param(&self) -> &str {
        match self {
            QueryValue::Value(v) => v,
            QueryValue::Absent => "null",
        }
    }
}

impl From<Option<String>> for QueryValue {
    fn from(value: Option<String>) -> Self {
        value.map(QueryValue::Value).unwrap_or(QueryValue::Absent)
    }
}

/// Ordered parameter mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.pairs.push((key.to_string(), QueryValue::Value(value.into())));
        self
    }

    pub fn with_optional(mut self, key: &str, value: Option<String>) -> Self {
        self.pairs.push((key.to_string(), value.into()));
        self
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// `k=v&k=v`, form-encoded (spaces as `+`).
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v.as_param())))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn form_encode(raw: &str) -> String {
    raw.split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_style_url() {
        let query = Query::new().with("main", "12").with("all", "1");
        assert_eq!(Endpoint::Empresas.spec().url("", &query), "/fetch_empresas/12/1");
        assert_eq!(
            Endpoint::Unidades.spec().url("https://host/app/", &Query::new().with("main", "3").with("company", "40")),
            "https://host/app/fetch_unidades/3/40"
        );
    }

    #[test]
    fn test_query_style_url_sends_absent_as_null() {
        let query = Query::new()
            .with("cod_empresa_principal", "12")
            .with_optional("status_empresas", None);
        assert_eq!(
            Endpoint::EmpresasV2.spec().url("", &query),
            "/fetch_empresas_v2?cod_empresa_principal=12&status_empresas=null"
        );
    }

    #[test]
    fn test_query_values_are_form_encoded() {
        let query = Query::new().with("filtro_grupos", "a b&c=d");
        assert_eq!(query.encode(), "filtro_grupos=a+b%26c%3Dd");
    }

    #[test]
    fn test_path_segments_are_escaped() {
        let query = Query::new().with("main", "a/b c");
        assert_eq!(Endpoint::Exames.spec().url("", &query), "/fetch_exames/a%2Fb%20c");
    }

    #[test]
    fn test_endpoint_table() {
        assert_eq!(Endpoint::Prestadores.spec().shape, ResponseShape::Wrapped("dados"));
        assert!(Endpoint::Prestadores.spec().empty_option);
        assert!(!Endpoint::Empresas.spec().empty_option);
        assert_eq!(Endpoint::EmpresasV2.spec().shape, ResponseShape::Bare);
        assert_eq!(Endpoint::EmpresasV2.spec().policy, ErrorPolicy::LogAndKeep);
        assert_eq!(Endpoint::Exames.spec().policy, ErrorPolicy::Propagate);
        let custom = Endpoint::Custom("/api/internal/empresa".into()).spec();
        assert_eq!(custom.style, UrlStyle::QueryString);
        assert_eq!(custom.route, "/api/internal/empresa");
    }

    #[test]
    fn test_extract_wrapped() {
        let body = json!({"dados": [{"id": 1, "nome": "Unit A"}]});
        let entries = ResponseShape::Wrapped(DATA_FIELD).extract(body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].nome, "Unit A");
    }

    #[test]
    fn test_shapes_are_not_interchangeable() {
        let bare = json!([{"id": 1, "nome": "A"}]);
        assert!(matches!(
            ResponseShape::Wrapped(DATA_FIELD).extract(bare),
            Err(LoadError::MissingField(_))
        ));
        let wrapped = json!({"dados": []});
        assert!(matches!(ResponseShape::Bare.extract(wrapped), Err(LoadError::Shape(_))));
    }
}
