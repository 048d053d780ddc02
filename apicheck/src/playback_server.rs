use crate::{error::Error, util, InteractionData, RequestData};
use futures::{channel::oneshot, FutureExt};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};
use tokio::runtime::Runtime;
use tracing::{info, warn};

#[derive(Debug)]
struct PlaybackState {
    interactions: Vec<InteractionData>,
    next_interaction: usize,
    error: Option<Error>,
}

impl PlaybackState {
    fn play(&mut self, request_data: &RequestData) -> Result<Response<Body>, Error> {
        let interaction = self
            .interactions
            .get(self.next_interaction)
            .ok_or_else(|| Error::PlaybackExhausted(describe(request_data)))?;
        self.next_interaction += 1;

        let recorded = &interaction.request_data;
        if recorded.method != request_data.method
            || recorded.uri != request_data.uri
            || !util::bodies_equal(&recorded.body, &request_data.body)
        {
            return Err(Error::PlaybackMismatch {
                interaction_number: interaction.interaction_number,
                expected: describe(recorded),
                actual: describe(request_data),
            });
        }

        let mut response_builder =
            Response::builder().status(interaction.response_data.status_code);

        if let Some(headers_mut) = response_builder.headers_mut() {
            util::put_headers(
                headers_mut,
                filter_headers(&interaction.response_data.headers),
            )?;
        }

        Ok(response_builder.body(interaction.response_data.body.clone().into())?)
    }
}

fn describe(request_data: &RequestData) -> String {
    if request_data.body.is_empty() {
        format!("{} {}", request_data.method, request_data.uri)
    } else {
        format!(
            "{} {} {}",
            request_data.method, request_data.uri, request_data.body
        )
    }
}

fn filter_headers<'a>(
    headers: &'a HashMap<String, String>,
) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
    // the recorded body is stored decoded and trimmed, so framing headers no longer apply
    headers.iter().filter(|(key, _)| {
        !key.eq_ignore_ascii_case("transfer-encoding")
            && !key.eq_ignore_ascii_case("content-length")
            && !key.eq_ignore_ascii_case("content-encoding")
    })
}

/// A loopback origin that answers with recorded interactions, in order.
///
/// Each request must match the recorded method, URI and body of the next
/// interaction. Anything else is answered with a 500 and remembered, so
/// [`PlaybackServer::finish`] can report it after the test body ran.
#[derive(Debug)]
pub struct PlaybackServer {
    address: SocketAddr,
    state: Arc<Mutex<PlaybackState>>,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<Result<(), Error>>>,
}

impl PlaybackServer {
    pub fn start(interactions: Vec<InteractionData>) -> Result<Self, Error> {
        let interaction_count = interactions.len();
        let state = Arc::new(Mutex::new(PlaybackState {
            interactions,
            next_interaction: 0,
            error: None,
        }));
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();
        let (address_sender, address_receiver) = mpsc::channel();
        let server_state = state.clone();

        let join_handle = thread::spawn(move || -> Result<(), Error> {
            Runtime::new()?.block_on(async move {
                let addr = SocketAddr::from(([127, 0, 0, 1], 0));

                let server = Server::try_bind(&addr)?.serve(make_service_fn(move |_| {
                    let state = server_state.clone();
                    async move {
                        Ok::<_, Infallible>(service_fn(move |req| {
                            handle_request(state.clone(), req)
                        }))
                    }
                }));

                let _ = address_sender.send(server.local_addr());

                server
                    .with_graceful_shutdown(shutdown_receiver.map(|_| ()))
                    .await?;

                Ok::<(), Error>(())
            })
        });

        let address = match address_receiver.recv() {
            Ok(address) => address,
            Err(_) => {
                return Err(match join_handle.join() {
                    Ok(Err(error)) => error,
                    _ => Error::PlaybackServerStopped,
                })
            }
        };

        info!(%address, interaction_count, "playback server started");

        Ok(Self {
            address,
            state,
            shutdown: Some(shutdown_sender),
            join_handle: Some(join_handle),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Origin to point a session at, e.g. `http://127.0.0.1:50123`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Stops the server and returns the first playback error, if any.
    pub fn finish(mut self) -> Result<(), Error> {
        self.stop()?;

        let mut state = self.state.lock()?;
        match state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> Result<(), Error> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        match self.join_handle.take() {
            Some(join_handle) => {
                let result = join_handle
                    .join()
                    .map_err(|_| Error::PlaybackServerStopped)?;
                info!(address = %self.address, "playback server stopped");
                result
            }
            None => Ok(()),
        }
    }
}

impl Drop for PlaybackServer {
    fn drop(&mut self) {
        if let Err(error) = self.stop() {
            warn!(%error, "couldn't stop the playback server");
        }
    }
}

async fn handle_request(
    state: Arc<Mutex<PlaybackState>>,
    request: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let result = match read_request_data(request).await {
        Ok(request_data) => play(&state, &request_data),
        Err(error) => Err(error),
    };

    match result {
        Ok(response) => Ok(response),
        Err(error) => {
            warn!(%error, "playback failed");
            if let Ok(mut state) = state.lock() {
                state.error.get_or_insert(error);
            }

            let mut response = Response::new(Body::empty());
            *response.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
            Ok(response)
        }
    }
}

fn play(
    state: &Mutex<PlaybackState>,
    request_data: &RequestData,
) -> Result<Response<Body>, Error> {
    state.lock()?.play(request_data)
}

async fn read_request_data(request: Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.into_body()).await?;

    Ok(RequestData {
        method,
        uri,
        headers,
        body: String::from_utf8_lossy(&body).into(),
    })
}
