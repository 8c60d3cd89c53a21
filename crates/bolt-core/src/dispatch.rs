//! Hand-off to the local launch endpoint.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use bolt_schema::{InstalledId, LaunchSession, Provider};

use crate::context::Context;
use crate::error::LaunchError;

/// One request to the launch endpoint.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub provider: Provider,
    /// Use the provider's configuration-mode endpoint, where it has one.
    pub configure: bool,
    /// Identifier to record once the endpoint accepts the launch.
    pub id: Option<InstalledId>,
    /// Query parameters, already filtered.
    pub params: Vec<(&'static str, String)>,
    /// Payload sent as the request body.
    pub body: Option<Vec<u8>>,
}

/// What the launch endpoint said, and whether the identifier was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Status text returned by the endpoint, trimmed.
    pub status: String,
    /// Identifier written to the store; `None` if there was none or the
    /// store failed to record it.
    pub recorded: Option<InstalledId>,
}

/// Query parameters for a launch, in a fixed order: identifier, session
/// fields, then provider flags. Empty values are left out.
pub fn launch_params(
    provider: Provider,
    id: Option<&InstalledId>,
    session: &LaunchSession,
    flags: Vec<(&'static str, String)>,
) -> Vec<(&'static str, String)> {
    let id = id
        .filter(|id| !id.is_empty())
        .map(|id| (provider.id_param(), id.to_string()));
    let session = session
        .query_pairs()
        .into_iter()
        .map(|(key, value)| (key, value.to_string()));

    id.into_iter()
        .chain(session)
        .chain(flags)
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Send `request` to the launch endpoint.
///
/// With a body the request is a `POST` of `application/octet-stream`,
/// otherwise a bodiless `GET`. Only a 200 counts as success, and only then is
/// the identifier written to the store. The client is already running by
/// then, so a store failure is reported rather than returned.
pub async fn dispatch(ctx: &Context, request: DispatchRequest) -> Result<Dispatched, LaunchError> {
    let DispatchRequest {
        provider,
        configure,
        id,
        params,
        body,
    } = request;

    let url = ctx
        .config
        .launch_endpoint(&provider.launch_path(configure));
    debug!(%provider, %url, params = params.len(), body = body.as_ref().map(Vec::len), "dispatching launch");

    let builder = match body {
        Some(body) => ctx
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body),
        None => ctx.client.get(&url),
    };

    let resp = builder
        .query(&params)
        .send()
        .await
        .map_err(|e| LaunchError::transport(&url, e))?;
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| LaunchError::transport(&url, e))?;
    let text = text.trim().to_string();

    if status != reqwest::StatusCode::OK {
        warn!(%provider, status = status.as_u16(), "launch endpoint rejected launch");
        return Err(LaunchError::Dispatch {
            status: status.as_u16(),
            message: text,
        });
    }

    ctx.reporter.launch_status(provider, &text);

    let recorded = match id {
        Some(id) => match ctx.store.set(provider, id.clone()) {
            Ok(()) => Some(id),
            Err(e) => {
                ctx.reporter.error(&format!(
                    "Launched {} but could not record installed version {id}: {e}",
                    provider.label()
                ));
                None
            }
        },
        None => None,
    };

    Ok(Dispatched {
        status: text,
        recorded,
    })
}
