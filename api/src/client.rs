use async_trait::async_trait;
use chrono::NaiveDate;
use futures::AsyncReadExt;
use http::{header, Method, Request, Uri};
use isahc::{AsyncBody, HttpClient};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::backend::PortfolioBackend;
use crate::error::ApiError;
use crate::model::{
    DcaParams, DcaResponse, DcaSeries, MarketEvent, MarketEventsResponse, Metrics,
    MetricsResponse, OptimizationResult, OptimizeResponse, PortfolioId, RequestContext,
    TargetReturn, TimeSeries, UploadResponse, ValueOverTimeResponse,
};
use crate::upload::{multipart_content_type, UploadFile};

/// Every endpoint lives under this path on the server
pub const BASE_PATH: &str = "/api";

pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug)]
pub struct Client {
    client: HttpClient,
    base: String,
}

impl Client {
    /// `server` is scheme and authority, e.g. `http://localhost:8000`
    pub fn new(server: &str) -> Result<Self, ApiError> {
        let client = HttpClient::new().map_err(|e| ApiError::network("client setup", e))?;

        Ok(Client {
            client,
            base: format!("{}{}", server.trim_end_matches('/'), BASE_PATH),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn get_url(&self, path: &str, params: Option<&[(&str, String)]>) -> Result<Uri, ApiError> {
        let uri = if let Some(params) = params {
            let params = serde_urlencoded::to_string(params).unwrap_or_default();
            format!("{}/{}?{}", self.base, path, params)
        } else {
            format!("{}/{}", self.base, path)
        };

        Ok(uri.parse::<Uri>().map_err(http::Error::from)?)
    }

    fn builder(&self, ctx: &RequestContext, method: Method, uri: Uri) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, ctx.user_id())
            .header(header::ACCEPT, "application/json")
    }

    async fn send<T, B>(&self, context: &'static str, request: Request<B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Into<AsyncBody>,
    {
        debug!(%context, method = %request.method(), uri = %request.uri(), "sending request");

        let res = self
            .client
            .send_async(request)
            .await
            .map_err(|e| ApiError::network(context, e))?;

        let status = res.status();

        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string();

            warn!(%context, status = status.as_u16(), %status_text, "request rejected");

            return Err(ApiError::Status {
                context,
                status: status.as_u16(),
                status_text,
            });
        }

        let mut body = res.into_body();
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes)
            .await
            .map_err(|source| ApiError::Network { context, source })?;

        decode(context, &bytes)
    }

    pub(crate) fn upload_request(
        &self,
        ctx: &RequestContext,
        file: &UploadFile,
        boundary: &str,
    ) -> Result<Request<Vec<u8>>, ApiError> {
        let url = self.get_url("portfolio/upload", None)?;

        Ok(self
            .builder(ctx, Method::POST, url)
            .header(header::CONTENT_TYPE, multipart_content_type(boundary))
            .body(file.multipart_body(boundary))?)
    }

    pub(crate) fn metrics_request(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Request<()>, ApiError> {
        let url = self.get_url(&format!("portfolio/metrics/{}", portfolio_id), None)?;

        Ok(self.builder(ctx, Method::GET, url).body(())?)
    }

    pub(crate) fn value_over_time_request(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Request<()>, ApiError> {
        let url = self.get_url(&format!("portfolio/value-over-time/{}", portfolio_id), None)?;

        Ok(self.builder(ctx, Method::GET, url).body(())?)
    }

    pub(crate) fn optimization_request(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        target_return: TargetReturn,
    ) -> Result<Request<()>, ApiError> {
        let params = [("target_return", target_return.fraction().to_string())];

        let url = self.get_url(
            &format!("portfolio/optimize/{}", portfolio_id),
            Some(&params),
        )?;

        Ok(self.builder(ctx, Method::GET, url).body(())?)
    }

    pub(crate) fn dca_simulation_request(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        params: &DcaParams,
    ) -> Result<Request<()>, ApiError> {
        let url = self.get_url(
            &format!("portfolio/dca-simulation/{}", portfolio_id),
            Some(&params.query()),
        )?;

        Ok(self.builder(ctx, Method::GET, url).body(())?)
    }

    pub(crate) fn market_events_request(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Request<()>, ApiError> {
        let params = [
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ];

        let url = self.get_url("market/events", Some(&params))?;

        Ok(self.builder(ctx, Method::GET, url).body(())?)
    }

    pub async fn upload_portfolio(
        &self,
        ctx: &RequestContext,
        file: &UploadFile,
    ) -> Result<PortfolioId, ApiError> {
        let request = self.upload_request(ctx, file, &multipart_boundary())?;

        let response: UploadResponse = self.send("upload", request).await?;
        let portfolio_id = response.validate()?;

        info!(%portfolio_id, file = file.file_name(), "portfolio uploaded");

        Ok(portfolio_id)
    }

    pub async fn get_metrics(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Metrics, ApiError> {
        let request = self.metrics_request(ctx, portfolio_id)?;

        let response: MetricsResponse = self.send("metrics fetch", request).await?;

        Ok(response.validate()?)
    }

    pub async fn get_value_over_time(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<TimeSeries, ApiError> {
        let request = self.value_over_time_request(ctx, portfolio_id)?;

        let response: ValueOverTimeResponse =
            self.send("value over time fetch", request).await?;

        Ok(response.validate()?)
    }

    pub async fn get_optimization(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        target_return: TargetReturn,
    ) -> Result<OptimizationResult, ApiError> {
        let request = self.optimization_request(ctx, portfolio_id, target_return)?;

        let response: OptimizeResponse = self.send("optimization", request).await?;

        Ok(response.validate()?)
    }

    pub async fn get_dca_simulation(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        params: &DcaParams,
    ) -> Result<DcaSeries, ApiError> {
        let request = self.dca_simulation_request(ctx, portfolio_id, params)?;

        let response: DcaResponse = self.send("DCA simulation", request).await?;

        Ok(response.validate()?)
    }

    pub async fn get_market_events(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketEvent>, ApiError> {
        let request = self.market_events_request(ctx, start, end)?;

        let response: MarketEventsResponse = self.send("market events fetch", request).await?;

        Ok(response.validate()?)
    }
}

#[async_trait]
impl PortfolioBackend for Client {
    async fn upload_portfolio(
        &self,
        ctx: &RequestContext,
        file: &UploadFile,
    ) -> Result<PortfolioId, ApiError> {
        Client::upload_portfolio(self, ctx, file).await
    }

    async fn get_metrics(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<Metrics, ApiError> {
        Client::get_metrics(self, ctx, portfolio_id).await
    }

    async fn get_value_over_time(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
    ) -> Result<TimeSeries, ApiError> {
        Client::get_value_over_time(self, ctx, portfolio_id).await
    }

    async fn get_optimization(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        target_return: TargetReturn,
    ) -> Result<OptimizationResult, ApiError> {
        Client::get_optimization(self, ctx, portfolio_id, target_return).await
    }

    async fn get_dca_simulation(
        &self,
        ctx: &RequestContext,
        portfolio_id: PortfolioId,
        params: &DcaParams,
    ) -> Result<DcaSeries, ApiError> {
        Client::get_dca_simulation(self, ctx, portfolio_id, params).await
    }

    async fn get_market_events(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketEvent>, ApiError> {
        Client::get_market_events(self, ctx, start, end).await
    }
}

fn decode<T: DeserializeOwned>(context: &'static str, bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|source| ApiError::Decode { context, source })
}

fn multipart_boundary() -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();

    format!("foliodash-{:x}", nanos)
}

#[cfg(test)]
mod tests {
    use async_std::net::TcpListener;
    use async_std::task;
    use futures::AsyncWriteExt;

    use super::*;
    use crate::error::ContractViolation;

    /// Answers a single request with `response` and returns the server address
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        task::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);

                if let Some(end) = header_end(&request) {
                    if request.len() >= end + content_length(&request[..end]) {
                        break;
                    }
                }
            }

            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn header_end(request: &[u8]) -> Option<usize> {
        request
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|idx| idx + 4)
    }

    fn content_length(headers: &[u8]) -> usize {
        String::from_utf8_lossy(headers)
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or(0)
    }

    fn client() -> Client {
        Client::new("http://localhost:8000/").unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new("user-1234")
    }

    #[test]
    fn base_includes_api_prefix() {
        assert_eq!(client().base(), "http://localhost:8000/api");
    }

    #[test]
    fn every_request_carries_user_id() {
        let client = client();
        let ctx = ctx();
        let id = PortfolioId(7);

        let requests = vec![
            client.metrics_request(&ctx, id).unwrap().map(|_| ()),
            client.value_over_time_request(&ctx, id).unwrap(),
            client
                .optimization_request(&ctx, id, TargetReturn::from_percent(10.0))
                .unwrap(),
            client
                .upload_request(&ctx, &UploadFile::new("a.csv", vec![]), "b")
                .unwrap()
                .map(|_| ()),
        ];

        for request in requests {
            assert_eq!(request.headers()[USER_ID_HEADER], "user-1234");
        }
    }

    #[test]
    fn paths_follow_endpoint_table() {
        let client = client();
        let ctx = ctx();
        let id = PortfolioId(42);

        assert_eq!(
            client.metrics_request(&ctx, id).unwrap().uri(),
            "http://localhost:8000/api/portfolio/metrics/42"
        );
        assert_eq!(
            client.value_over_time_request(&ctx, id).unwrap().uri(),
            "http://localhost:8000/api/portfolio/value-over-time/42"
        );

        let upload = client
            .upload_request(&ctx, &UploadFile::new("a.csv", vec![]), "bnd")
            .unwrap();
        assert_eq!(upload.method(), Method::POST);
        assert_eq!(upload.uri(), "http://localhost:8000/api/portfolio/upload");
        assert_eq!(
            upload.headers()[header::CONTENT_TYPE],
            "multipart/form-data; boundary=bnd"
        );
    }

    #[test]
    fn optimization_sends_target_as_fraction() {
        let request = client()
            .optimization_request(&ctx(), PortfolioId(3), TargetReturn::from_percent(30.0))
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/api/portfolio/optimize/3");
        assert_eq!(request.uri().query(), Some("target_return=0.3"));
    }

    #[test]
    fn dca_simulation_sends_four_parameters() {
        let params = DcaParams {
            initial_investment: 2600.0,
            monthly_contribution: 500.0,
            years: 10,
            target_return: TargetReturn::from_percent(30.0),
        };

        let request = client()
            .dca_simulation_request(&ctx(), PortfolioId(3), &params)
            .unwrap();

        assert_eq!(request.uri().path(), "/api/portfolio/dca-simulation/3");
        assert_eq!(
            request.uri().query(),
            Some("initial_investment=2600&monthly_contribution=500&years=10&target_return=0.3")
        );
    }

    #[test]
    fn market_events_send_date_range() {
        let request = client()
            .market_events_request(
                &ctx(),
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            )
            .unwrap();

        assert_eq!(request.uri().path(), "/api/market/events");
        assert_eq!(
            request.uri().query(),
            Some("start_date=2023-01-01&end_date=2024-06-30")
        );
    }

    #[test]
    fn invalid_server_is_a_request_error() {
        let client = Client::new("not a url").unwrap();

        assert!(matches!(
            client.metrics_request(&ctx(), PortfolioId(1)),
            Err(ApiError::Request(_))
        ));
    }

    #[async_std::test]
    async fn non_success_status_carries_status_text() {
        let server = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let err = Client::new(&server)
            .unwrap()
            .get_metrics(&ctx(), PortfolioId(9))
            .await
            .unwrap_err();

        match err {
            ApiError::Status {
                status,
                status_text,
                context,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(context, "metrics fetch");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[async_std::test]
    async fn upload_reads_portfolio_id_from_response() {
        let server = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 19\r\n\
             Connection: close\r\n\r\n{\"portfolio_id\": 5}",
        )
        .await;

        let file = UploadFile::new(
            "trades.csv",
            b"date,ticker,action,shares,price,amount,notes\n".to_vec(),
        );
        let id = Client::new(&server)
            .unwrap()
            .upload_portfolio(&ctx(), &file)
            .await
            .unwrap();

        assert_eq!(id, PortfolioId(5));
    }

    #[async_std::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = Client::new(&server)
            .unwrap()
            .get_metrics(&ctx(), PortfolioId(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Network { context: "metrics fetch", .. }));
    }

    #[test]
    fn decode_distinguishes_bad_json_from_missing_fields() {
        let err = decode::<UploadResponse>("upload", b"<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { context: "upload", .. }));

        let response = decode::<UploadResponse>("upload", br#"{"message": "ok"}"#).unwrap();
        assert_eq!(
            response.validate(),
            Err(ContractViolation::MissingField("portfolio_id"))
        );

        let response =
            decode::<UploadResponse>("upload", br#"{"message": "ok", "portfolio_id": 12}"#)
                .unwrap();
        assert_eq!(response.validate(), Ok(PortfolioId(12)));
    }
}
