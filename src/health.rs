use log::info;
use warp::Filter;

const ALIVE_BODY: &str = "WMI registration bot is running.";

/// `GET /` liveness route used by the hosting platform's probe.
pub fn route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::get().and(warp::path::end()).map(|| ALIVE_BODY)
}

pub async fn serve(port: u16) {
    info!("Health check listening on port {}", port);
    warp::serve(route()).run(([0, 0, 0, 0], port)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_answers_with_alive_body() {
        let response = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&route())
            .await;

        assert_eq!(response.status(), 200);
        assert!(!response.body().is_empty());
    }

    #[tokio::test]
    async fn other_paths_are_rejected() {
        let response = warp::test::request()
            .method("GET")
            .path("/metrics")
            .reply(&route())
            .await;

        assert_eq!(response.status(), 404);
    }
}
