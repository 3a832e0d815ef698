use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request, Response};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for route handlers
///
/// Handlers receive a clone of the router state and the request.
pub type BoxedHandler<S> =
    Box<dyn Fn(S, Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// HTTP Router with per-method route tables
///
/// The router owns the application state and hands a clone of it to every
/// handler, so dependencies are passed explicitly rather than looked up.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new(state)
///     .get("/todos", controllers::todo::index)
///     .post("/todos", controllers::todo::store)
///     .get("/todos/{id}", controllers::todo::show);
/// ```
pub struct Router<S> {
    state: S,
    get_routes: MatchitRouter<Arc<BoxedHandler<S>>>,
    post_routes: MatchitRouter<Arc<BoxedHandler<S>>>,
    patch_routes: MatchitRouter<Arc<BoxedHandler<S>>>,
    delete_routes: MatchitRouter<Arc<BoxedHandler<S>>>,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self {
            state,
            get_routes: MatchitRouter::new(),
            post_routes: MatchitRouter::new(),
            patch_routes: MatchitRouter::new(),
            delete_routes: MatchitRouter::new(),
        }
    }

    fn insert<H, Fut>(table: &mut MatchitRouter<Arc<BoxedHandler<S>>>, path: &str, handler: H)
    where
        H: Fn(S, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler<S> = Box::new(move |state, req| Box::pin(handler(state, req)));
        if let Err(e) = table.insert(path, Arc::new(handler)) {
            tracing::warn!(path, error = %e, "route not registered");
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(S, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::insert(&mut self.get_routes, path, handler);
        self
    }

    /// Register a POST route
    pub fn post<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(S, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::insert(&mut self.post_routes, path, handler);
        self
    }

    /// Register a PATCH route
    pub fn patch<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(S, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::insert(&mut self.patch_routes, path, handler);
        self
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(S, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::insert(&mut self.delete_routes, path, handler);
        self
    }

    /// Match a request and return the handler with extracted params
    pub fn match_route(
        &self,
        method: &hyper::Method,
        path: &str,
    ) -> Option<(Arc<BoxedHandler<S>>, HashMap<String, String>)> {
        let router = match *method {
            hyper::Method::GET => &self.get_routes,
            hyper::Method::POST => &self.post_routes,
            hyper::Method::PATCH => &self.patch_routes,
            hyper::Method::DELETE => &self.delete_routes,
            _ => return None,
        };

        router.at(path).ok().map(|matched| {
            let params: HashMap<String, String> = matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (matched.value.clone(), params)
        })
    }

    /// Route a request to its handler and produce the final response
    ///
    /// Unmatched requests produce a 404 `NotFoundError` body.
    pub async fn dispatch(&self, req: Request) -> HttpResponse {
        match self.match_route(req.method(), req.path()) {
            Some((handler, params)) => {
                let request = req.with_params(params);
                // Both Ok and Err carry an HttpResponse
                handler(self.state.clone(), request)
                    .await
                    .unwrap_or_else(|e| e)
            }
            None => FrameworkError::RouteNotFound {
                method: req.method().to_string(),
                path: req.path().to_string(),
            }
            .into(),
        }
    }
}
