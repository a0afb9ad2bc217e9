//! HTTP control surface
//!
//! Transport agnostic: the network stack parses the request line and body,
//! hands them over as a [`ControlRequest`] and writes the returned
//! [`ControlResponse`] back. Every request gets a definite response and a
//! rejected request never changes any state.

use alloc::collections::BTreeMap;
use alloc::string::ToString;
use alloc::vec::Vec;

use embassy_time::Instant;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::OutputDriver;
use crate::config::is_valid_led_count;
use crate::effect::EffectId;
use crate::storage::{KeyValueStore, PositionMap};
use crate::tree::{BaseColorUpdate, TreeController};

pub type StatusCode = u16;

pub const STATUS_OK: StatusCode = 200;
pub const STATUS_NO_CONTENT: StatusCode = 204;
pub const STATUS_BAD_REQUEST: StatusCode = 400;
pub const STATUS_NOT_FOUND: StatusCode = 404;
pub const STATUS_METHOD_NOT_ALLOWED: StatusCode = 405;

const EFFECTS_PREFIX: &str = "/effects/";

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }
}

/// Decoded HTTP request
#[derive(Debug, Clone, Copy)]
pub struct ControlRequest<'a> {
    pub method: HttpMethod,
    /// Request target, a query string is ignored
    pub path: &'a str,
    pub body: &'a [u8],
}

impl<'a> ControlRequest<'a> {
    pub const fn new(method: HttpMethod, path: &'a str, body: &'a [u8]) -> Self {
        Self { method, path, body }
    }

    pub const fn get(path: &'a str) -> Self {
        Self::new(HttpMethod::Get, path, &[])
    }

    pub const fn post(path: &'a str, body: &'a [u8]) -> Self {
        Self::new(HttpMethod::Post, path, body)
    }

    fn route_path(&self) -> &'a str {
        self.path.split('?').next().unwrap_or(self.path)
    }
}

/// Response to write back
///
/// A body, when present, is always JSON except for error responses, which
/// carry a short plain text reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlResponse {
    pub status: StatusCode,
    pub body: Option<Vec<u8>>,
}

impl ControlResponse {
    pub const fn no_content() -> Self {
        Self {
            status: STATUS_NO_CONTENT,
            body: None,
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        Self::raw_json(serde_json::to_vec(value).unwrap_or_default())
    }

    pub const fn raw_json(body: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            body: Some(body),
        }
    }

    pub fn from_error(error: ControlError) -> Self {
        Self {
            status: error.status(),
            body: Some(error.to_string().into_bytes()),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Reasons a request is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Bad Request: malformed JSON body")]
    BadJson,
    #[error("Bad Request: value out of range")]
    OutOfRange,
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ControlError {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::BadJson | Self::OutOfRange => STATUS_BAD_REQUEST,
            Self::NotFound => STATUS_NOT_FOUND,
            Self::MethodNotAllowed => STATUS_METHOD_NOT_ALLOWED,
        }
    }
}

type ControlResult = Result<ControlResponse, ControlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    ConfigureLeds,
    SetLedPositions,
    GetSavedLedPositions,
    SetNumLeds,
    GetNumLeds,
    MaskLed,
    UnmaskLed,
    UnmaskAll,
    GetBaseColor,
    SetBaseColor,
    GetCurrentEffect,
    StopEffect,
    StartEffect(EffectId),
}

impl Route {
    fn resolve(method: HttpMethod, path: &str) -> Result<Self, ControlError> {
        let route = match method {
            HttpMethod::Get => Self::get(path),
            HttpMethod::Post => Self::post(path),
        };
        route.ok_or_else(|| {
            if Self::get(path).is_some() || Self::post(path).is_some() {
                ControlError::MethodNotAllowed
            } else {
                ControlError::NotFound
            }
        })
    }

    fn get(path: &str) -> Option<Self> {
        Some(match path {
            "/get_saved_led_positions" => Self::GetSavedLedPositions,
            "/get_num_leds" => Self::GetNumLeds,
            "/effects/basecolor" => Self::GetBaseColor,
            "/effects/current" => Self::GetCurrentEffect,
            _ => return None,
        })
    }

    fn post(path: &str) -> Option<Self> {
        Some(match path {
            "/configure_leds" => Self::ConfigureLeds,
            "/set_led_positions" => Self::SetLedPositions,
            "/set_num_leds" => Self::SetNumLeds,
            "/mask_led" => Self::MaskLed,
            "/unmask_led" => Self::UnmaskLed,
            "/unmask_all" => Self::UnmaskAll,
            "/effects/basecolor" => Self::SetBaseColor,
            "/effects/stop" => Self::StopEffect,
            _ => {
                let name = path.strip_prefix(EFFECTS_PREFIX)?;
                Self::StartEffect(EffectId::parse_from_str(name)?)
            }
        })
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct NumBody {
    num: i64,
}

#[derive(Debug, Deserialize, Serialize)]
struct ColorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    r: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    g: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    b: Option<u8>,
}

#[derive(Debug, Serialize)]
struct EffectBody {
    effect: &'static str,
}

/// Handle one control request
///
/// `now` is the time used as the start of any effect the request starts.
pub fn handle_request<D, S>(
    tree: &mut TreeController<D, S>,
    request: &ControlRequest<'_>,
    now: Instant,
) -> ControlResponse
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let result = Route::resolve(request.method, request.route_path())
        .and_then(|route| dispatch(tree, route, request.body, now));

    match result {
        Ok(response) => response,
        Err(err) => {
            log!("control: {} rejected: {}", request.path, err);
            ControlResponse::from_error(err)
        }
    }
}

fn dispatch<D, S>(tree: &mut TreeController<D, S>, route: Route, body: &[u8], now: Instant) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    match route {
        Route::ConfigureLeds => handle_configure_leds(tree, body),
        Route::SetLedPositions => handle_set_led_positions(tree, body, now),
        Route::GetSavedLedPositions => Ok(handle_get_saved_led_positions(tree)),
        Route::SetNumLeds => handle_set_num_leds(tree, body, now),
        Route::GetNumLeds => Ok(ControlResponse::json(&NumBody {
            num: i64::try_from(tree.led_count()).unwrap_or(i64::MAX),
        })),
        Route::MaskLed => handle_mask(tree, body, false),
        Route::UnmaskLed => handle_mask(tree, body, true),
        Route::UnmaskAll => {
            tree.unmask_all();
            Ok(ControlResponse::no_content())
        }
        Route::GetBaseColor => {
            let color = tree.base_color();
            Ok(ControlResponse::json(&ColorBody {
                r: Some(color.r),
                g: Some(color.g),
                b: Some(color.b),
            }))
        }
        Route::SetBaseColor => handle_set_base_color(tree, body),
        Route::GetCurrentEffect => Ok(ControlResponse::json(&EffectBody {
            effect: tree.current_effect().as_str(),
        })),
        Route::StopEffect => {
            tree.stop_effect();
            Ok(ControlResponse::no_content())
        }
        Route::StartEffect(effect) => {
            tree.start_effect(effect, now);
            Ok(ControlResponse::no_content())
        }
    }
}

fn read_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ControlError> {
    serde_json::from_slice(body).map_err(|_| ControlError::BadJson)
}

fn handle_configure_leds<D, S>(tree: &mut TreeController<D, S>, body: &[u8]) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let leds: BTreeMap<usize, bool> = read_json(body)?;
    if leds.keys().any(|&index| index >= tree.led_count()) {
        return Err(ControlError::OutOfRange);
    }
    let leds: Vec<(usize, bool)> = leds.into_iter().collect();
    tree.configure_leds(&leds);
    Ok(ControlResponse::no_content())
}

fn handle_set_led_positions<D, S>(
    tree: &mut TreeController<D, S>,
    body: &[u8],
    now: Instant,
) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let positions: PositionMap = read_json(body)?;
    if !tree.set_led_positions(&positions, now) {
        return Err(ControlError::OutOfRange);
    }
    Ok(ControlResponse::no_content())
}

fn handle_get_saved_led_positions<D, S>(tree: &TreeController<D, S>) -> ControlResponse
where
    D: OutputDriver,
    S: KeyValueStore,
{
    match tree.saved_led_positions() {
        Some(blob) => ControlResponse::raw_json(blob),
        None => ControlResponse::no_content(),
    }
}

fn handle_set_num_leds<D, S>(tree: &mut TreeController<D, S>, body: &[u8], now: Instant) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let NumBody { num } = read_json(body)?;
    let count = usize::try_from(num)
        .ok()
        .filter(|&count| is_valid_led_count(count))
        .ok_or(ControlError::OutOfRange)?;
    tree.set_led_count(count, now);
    Ok(ControlResponse::no_content())
}

fn handle_mask<D, S>(tree: &mut TreeController<D, S>, body: &[u8], enabled: bool) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let NumBody { num } = read_json(body)?;
    let index = usize::try_from(num)
        .ok()
        .filter(|&index| index < tree.led_count())
        .ok_or(ControlError::OutOfRange)?;
    tree.set_mask(index, enabled);
    Ok(ControlResponse::no_content())
}

fn handle_set_base_color<D, S>(tree: &mut TreeController<D, S>, body: &[u8]) -> ControlResult
where
    D: OutputDriver,
    S: KeyValueStore,
{
    let ColorBody { r, g, b } = read_json(body)?;
    tree.set_base_color(BaseColorUpdate { r, g, b });
    Ok(ControlResponse::no_content())
}
