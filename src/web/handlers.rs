//! Screen handlers.
//!
//! Each handler maps one screen of the register → login → mailbox flow onto
//! broker or facade calls. Failed sends and forced logouts surface as
//! notification cookies rendered on the next GET (post-redirect-get), and any
//! status that invalidates the session also clears the client-held
//! credentials.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::agent::Agent;
use crate::broker::Broker;
use crate::gatekeeper::Gatekeeper;
use crate::protocol::DeliveryStatus;

use super::{cookies, pages};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
    pub gatekeeper: Arc<dyn Gatekeeper>,
}

/// Outcome of the session guard shared by the logged-in screens.
enum Gate {
    /// Cookies present and the broker confirms a live session.
    Open { agent_id: String, session_key: String },
    /// Caller must be bounced; the prepared response redirects.
    Bounce(Response),
}

/// Check the id/session cookies against the broker.
///
/// Missing cookies bounce to the register screen; a dead session additionally
/// clears the stale cookies and leaves a logged-out notification.
fn gate(state: &AppState, headers: &HeaderMap) -> Gate {
    let (agent_id, session_key) = match (
        cookies::get(headers, cookies::AGENT_ID),
        cookies::get(headers, cookies::SESSION_KEY),
    ) {
        (Some(id), Some(key)) => (id, key),
        _ => return Gate::Bounce(Redirect::to("/register").into_response()),
    };

    if !state.broker.agent_logged_in(&agent_id) {
        let out = AppendHeaders(vec![
            (header::SET_COOKIE, cookies::clear(cookies::AGENT_ID)),
            (header::SET_COOKIE, cookies::clear(cookies::SESSION_KEY)),
            (
                header::SET_COOKIE,
                cookies::set(
                    cookies::LOGGED_OUT_STATUS,
                    "You_were_logged_out_of_the_system.",
                ),
            ),
        ]);
        return Gate::Bounce((out, Redirect::to("/register")).into_response());
    }

    Gate::Open {
        agent_id,
        session_key,
    }
}

pub async fn index() -> Redirect {
    Redirect::to("/register")
}

pub async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(rename = "idInput")]
    id_input: String,
}

pub async fn register_form(headers: HeaderMap) -> Response {
    let mut out = Vec::new();
    let mut notification = String::new();
    if let Some(value) = cookies::get(&headers, cookies::LOGGED_OUT_STATUS) {
        notification = value.replace('_', " ");
        out.push((header::SET_COOKIE, cookies::clear(cookies::LOGGED_OUT_STATUS)));
    }

    let content = format!(
        "{}{}{}<br>{}",
        pages::notification(&notification),
        pages::post_form("registerForm", "/register"),
        pages::input_field("idInput", "Agent ID", true),
        pages::submit_button("submit", "Register"),
    );

    (
        AppendHeaders(out),
        Html(pages::screen("Register Screen", &content)),
    )
        .into_response()
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let mut agent = Agent::new(&form.id_input, state.broker.clone(), state.gatekeeper.clone());

    if agent.register() {
        let login_key = agent.login_key().unwrap_or_default().to_string();
        let out = AppendHeaders(vec![
            (header::SET_COOKIE, cookies::set(cookies::AGENT_ID, agent.id())),
            (header::SET_COOKIE, cookies::set(cookies::LOGIN_KEY, &login_key)),
        ]);
        (out, Redirect::to("/login")).into_response()
    } else {
        let out = AppendHeaders(vec![(
            header::SET_COOKIE,
            cookies::set(cookies::LOGGED_OUT_STATUS, "Access_denied_by_the_gatekeeper."),
        )]);
        (out, Redirect::to("/register")).into_response()
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(rename = "lKeyInput")]
    login_key_input: String,
}

pub async fn login_form(headers: HeaderMap) -> Response {
    let (agent_id, login_key) = match (
        cookies::get(&headers, cookies::AGENT_ID),
        cookies::get(&headers, cookies::LOGIN_KEY),
    ) {
        (Some(id), Some(key)) => (id, key),
        _ => return Redirect::to("/register").into_response(),
    };

    let mut out = Vec::new();
    let mut notification = String::new();
    if let Some(value) = cookies::get(&headers, cookies::LOGIN_DENIED_STATUS) {
        notification = value.replace('_', " ");
        out.push((
            header::SET_COOKIE,
            cookies::clear(cookies::LOGIN_DENIED_STATUS),
        ));
    }

    let content = format!(
        "{}{}<p><b>Agent ID</b>: {}<br><b>Login key</b>: {}<br></p>{}<br>{}",
        pages::notification(&notification),
        pages::post_form("loginForm", "/login"),
        pages::span("id", &agent_id),
        pages::span("lKey", &login_key),
        pages::input_field("lKeyInput", "Confirm login key", true),
        pages::submit_button("submit", "Login"),
    );

    (
        AppendHeaders(out),
        Html(pages::screen("Login Screen", &content)),
    )
        .into_response()
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let agent_id = match (
        cookies::get(&headers, cookies::AGENT_ID),
        cookies::get(&headers, cookies::LOGIN_KEY),
    ) {
        (Some(id), Some(_)) => id,
        _ => return Redirect::to("/register").into_response(),
    };

    // The typed confirmation is what gets exchanged, not the cookie copy.
    let mut agent = Agent::with_login_key(
        &agent_id,
        state.broker.clone(),
        state.gatekeeper.clone(),
        form.login_key_input,
    );

    if agent.login() {
        let session_key = agent.session_key().unwrap_or_default().to_string();
        let out = AppendHeaders(vec![
            (header::SET_COOKIE, cookies::clear(cookies::LOGIN_KEY)),
            (
                header::SET_COOKIE,
                cookies::set(cookies::SESSION_KEY, &session_key),
            ),
        ]);
        (out, Redirect::to("/loggedin")).into_response()
    } else {
        let out = AppendHeaders(vec![(
            header::SET_COOKIE,
            cookies::set(
                cookies::LOGIN_DENIED_STATUS,
                "Login_failed_due_to_incorrect_or_expired_login_key.",
            ),
        )]);
        (out, Redirect::to("/login")).into_response()
    }
}

pub async fn logged_in(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let agent_id = match gate(&state, &headers) {
        Gate::Open { agent_id, .. } => agent_id,
        Gate::Bounce(response) => return response,
    };

    let content = format!(
        "{}<br>{}<br><hr>{}",
        pages::href_button("/readmessage", "consumeMessage", "Get Next Message"),
        pages::href_button("/sendmessage", "sendMessage", "Send a Message"),
        pages::href_button("/logout", "logout", "Logout"),
    );

    Html(pages::screen(
        &format!("Agent {}'s Mailbox", agent_id),
        &content,
    ))
    .into_response()
}

#[derive(Deserialize)]
pub struct ComposeForm {
    destination: String,
    #[serde(rename = "messageBody")]
    message_body: String,
}

pub async fn send_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Gate::Bounce(response) = gate(&state, &headers) {
        return response;
    }

    let mut out = Vec::new();
    let mut notification = String::new();
    if let Some(value) = cookies::get(&headers, cookies::MESSAGE_SENDING_STATUS) {
        out.push((
            header::SET_COOKIE,
            cookies::clear(cookies::MESSAGE_SENDING_STATUS),
        ));

        let status =
            DeliveryStatus::from_name(&value).unwrap_or(DeliveryStatus::GenericError);
        notification = match status {
            DeliveryStatus::Ok => "Message sent successfully.".to_string(),
            DeliveryStatus::TargetAgentDoesNotExist => {
                "Message not sent since the target agent does not exist.".to_string()
            }
            DeliveryStatus::MessageLengthExceeded => format!(
                "Message not sent since it is longer than {} characters.",
                state.broker.limits().max_message_length
            ),
            DeliveryStatus::TargetAgentQuotaExceeded => {
                "Message not sent since the target agent's quota was exceeded.".to_string()
            }
            _ => {
                // Session-invalidating codes clear the cookies on POST and
                // never reach this screen.
                tracing::error!(status = %status, "unexpected status cookie on send screen");
                String::new()
            }
        };
    }

    let content = format!(
        "<div id=\"composeFormBlock\" class=\"compose\">{}{}{}<br>{}<br>{}</div>{}",
        pages::notification(&notification),
        pages::post_form("composeForm", "/sendmessage"),
        pages::input_field("destination", "To Agent ID:", true),
        pages::text_area("messageBody", "Message Body", 2, 70),
        pages::submit_button("submit", "Send message"),
        pages::href_button("/loggedin", "backToMailbox", "Go back"),
    );

    (
        AppendHeaders(out),
        Html(pages::screen("Send a Message", &content)),
    )
        .into_response()
}

pub async fn send_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ComposeForm>,
) -> Response {
    let (agent_id, session_key) = match gate(&state, &headers) {
        Gate::Open {
            agent_id,
            session_key,
        } => (agent_id, session_key),
        Gate::Bounce(response) => return response,
    };

    let status = state.broker.send_message(
        &session_key,
        &agent_id,
        &form.destination,
        &form.message_body,
    );

    let out = match status {
        // System-error codes: the broker state no longer matches the cookies.
        DeliveryStatus::SourceAgentDoesNotExist
        | DeliveryStatus::SourceAgentNotLoggedIn
        | DeliveryStatus::SessionKeyUnrecognized
        | DeliveryStatus::FailedToAddToMailbox => AppendHeaders(vec![
            (header::SET_COOKIE, cookies::clear(cookies::AGENT_ID)),
            (header::SET_COOKIE, cookies::clear(cookies::SESSION_KEY)),
            (
                header::SET_COOKIE,
                cookies::set(
                    cookies::LOGGED_OUT_STATUS,
                    "You_were_logged_out_due_to_an_error_in_the_system.",
                ),
            ),
        ]),

        // The sender's quota fired; their session is gone.
        DeliveryStatus::SourceAgentQuotaExceeded | DeliveryStatus::BothAgentQuotasExceeded => {
            AppendHeaders(vec![
                (header::SET_COOKIE, cookies::clear(cookies::AGENT_ID)),
                (header::SET_COOKIE, cookies::clear(cookies::SESSION_KEY)),
                (
                    header::SET_COOKIE,
                    cookies::set(
                        cookies::LOGGED_OUT_STATUS,
                        "You_were_logged_out_of_the_system.",
                    ),
                ),
            ])
        }

        _ => AppendHeaders(vec![(
            header::SET_COOKIE,
            cookies::set(cookies::MESSAGE_SENDING_STATUS, status.as_str()),
        )]),
    };

    (out, Redirect::to("/sendmessage")).into_response()
}

pub async fn read_message(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (agent_id, session_key) = match gate(&state, &headers) {
        Gate::Open {
            agent_id,
            session_key,
        } => (agent_id, session_key),
        Gate::Bounce(response) => return response,
    };

    let next = if state.broker.agent_has_messages(&agent_id) {
        state.broker.get_next_message(&session_key, &agent_id)
    } else {
        None
    };

    let content = match next {
        Some(mut message) => {
            let now = state.broker.now();
            let body = message.body(now).unwrap_or_default().to_string();
            format!(
                "<p id=\"messageContainer\"><b>From</b>: Agent {}<br><b>To</b>: Agent {}<br>\
                 <b>Timestamp</b>: {}<br><b>Message</b>: {}<br></p>{}<br>{}",
                pages::span("from", message.source_id()),
                pages::span("to", message.target_id()),
                pages::span("timestamp", &message.sent_at().to_rfc3339()),
                pages::span("message", &body),
                pages::href_button("/readmessage", "consume", "Consume another message"),
                pages::href_button("/loggedin", "backToMailbox", "Go back"),
            )
        }
        None => format!(
            "<p id=\"messageContainer\">You have no new messages.</p>{}<br>{}",
            pages::href_button("/readmessage", "consume", "Try again"),
            pages::href_button("/loggedin", "backToMailbox", "Go back"),
        ),
    };

    Html(pages::screen("Latest Message", &content)).into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut out = Vec::new();

    if let (Some(agent_id), Some(_)) = (
        cookies::get(&headers, cookies::AGENT_ID),
        cookies::get(&headers, cookies::SESSION_KEY),
    ) {
        state.broker.logout(&agent_id);
        out.push((header::SET_COOKIE, cookies::clear(cookies::AGENT_ID)));
        out.push((header::SET_COOKIE, cookies::clear(cookies::SESSION_KEY)));
    }

    out.push((
        header::SET_COOKIE,
        cookies::set(cookies::LOGGED_OUT_STATUS, "Successfully_logged_out."),
    ));

    (AppendHeaders(out), Redirect::to("/register")).into_response()
}
