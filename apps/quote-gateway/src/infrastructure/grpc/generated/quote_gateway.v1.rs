// @generated
// This file is @generated by prost-build.
/// Board snapshot for one symbol.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Quote {
    #[prost(string, tag = "1")]
    pub symbol: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub exchange: i32,
    #[prost(string, tag = "3")]
    pub symbol_name: ::prost::alloc::string::String,
    #[prost(double, optional, tag = "4")]
    pub last_price: ::core::option::Option<f64>,
    #[prost(double, optional, tag = "5")]
    pub bid_price: ::core::option::Option<f64>,
    #[prost(double, tag = "6")]
    pub bid_qty: f64,
    #[prost(double, optional, tag = "7")]
    pub ask_price: ::core::option::Option<f64>,
    #[prost(double, tag = "8")]
    pub ask_qty: f64,
    #[prost(double, tag = "9")]
    pub trading_volume: f64,
    #[prost(message, optional, tag = "10")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct StreamQuotesRequest {
    /// Symbols to receive. Empty means every pushed symbol.
    #[prost(string, repeated, tag = "1")]
    pub symbols: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamQuotesResponse {
    #[prost(message, optional, tag = "1")]
    pub quote: ::core::option::Option<Quote>,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct GetQuoteRequest {
    #[prost(string, tag = "1")]
    pub symbol: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub exchange: i32,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetQuoteResponse {
    #[prost(message, optional, tag = "1")]
    pub quote: ::core::option::Option<Quote>,
}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct GetSessionStatusRequest {}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct GetSessionStatusResponse {
    #[prost(bool, tag = "1")]
    pub has_token: bool,
    #[prost(message, optional, tag = "2")]
    pub expires_at: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(enumeration = "LinkState", tag = "3")]
    pub link_state: i32,
    #[prost(uint32, tag = "4")]
    pub consumers: u32,
}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct RefreshSessionRequest {}
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct RefreshSessionResponse {
    #[prost(message, optional, tag = "1")]
    pub expires_at: ::core::option::Option<::prost_types::Timestamp>,
}
/// Upstream push link state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LinkState {
    Unspecified = 0,
    Disconnected = 1,
    Connecting = 2,
    Connected = 3,
}
impl LinkState {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "LINK_STATE_UNSPECIFIED",
            Self::Disconnected => "LINK_STATE_DISCONNECTED",
            Self::Connecting => "LINK_STATE_CONNECTING",
            Self::Connected => "LINK_STATE_CONNECTED",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "LINK_STATE_UNSPECIFIED" => Some(Self::Unspecified),
            "LINK_STATE_DISCONNECTED" => Some(Self::Disconnected),
            "LINK_STATE_CONNECTING" => Some(Self::Connecting),
            "LINK_STATE_CONNECTED" => Some(Self::Connected),
            _ => None,
        }
    }
}
/// Generated client implementations.
pub mod quote_gateway_service_client {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value,
    )]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    /** QuoteGatewayService exposes a broker's real-time board feed and session
 through a single gRPC interface. One upstream push connection is shared by
 every StreamQuotes caller.
*/
    #[derive(Debug, Clone)]
    pub struct QuoteGatewayServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl QuoteGatewayServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> QuoteGatewayServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> QuoteGatewayServiceClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::Body>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::Body>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::Body>,
            >>::Error: Into<StdError> + std::marker::Send + std::marker::Sync,
        {
            QuoteGatewayServiceClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        /** Stream real-time quotes. Ends with UNAVAILABLE when the upstream link
 fails or this client cannot keep up.
*/
        pub async fn stream_quotes(
            &mut self,
            request: impl tonic::IntoRequest<super::StreamQuotesRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::StreamQuotesResponse>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/quote_gateway.v1.QuoteGatewayService/StreamQuotes",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("quote_gateway.v1.QuoteGatewayService", "StreamQuotes"));
            self.inner.server_streaming(req, path, codec).await
        }
        /** Fetch a one-off board snapshot (privileged, uses the session token).
*/
        pub async fn get_quote(
            &mut self,
            request: impl tonic::IntoRequest<super::GetQuoteRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetQuoteResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/quote_gateway.v1.QuoteGatewayService/GetQuote",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("quote_gateway.v1.QuoteGatewayService", "GetQuote"));
            self.inner.unary(req, path, codec).await
        }
        /** Report session and stream status.
*/
        pub async fn get_session_status(
            &mut self,
            request: impl tonic::IntoRequest<super::GetSessionStatusRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetSessionStatusResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/quote_gateway.v1.QuoteGatewayService/GetSessionStatus",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("quote_gateway.v1.QuoteGatewayService", "GetSessionStatus"));
            self.inner.unary(req, path, codec).await
        }
        /** Discard the cached session token and log in again.
*/
        pub async fn refresh_session(
            &mut self,
            request: impl tonic::IntoRequest<super::RefreshSessionRequest>,
        ) -> std::result::Result<
            tonic::Response<super::RefreshSessionResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::unknown(
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic_prost::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/quote_gateway.v1.QuoteGatewayService/RefreshSession",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("quote_gateway.v1.QuoteGatewayService", "RefreshSession"));
            self.inner.unary(req, path, codec).await
        }
    }
}
/// Generated server implementations.
pub mod quote_gateway_service_server {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value,
    )]
    use tonic::codegen::*;
    /// Generated trait containing gRPC methods that should be implemented for use with QuoteGatewayServiceServer.
    #[async_trait]
    pub trait QuoteGatewayService: std::marker::Send + std::marker::Sync + 'static {
        /// Server streaming response type for the StreamQuotes method.
        type StreamQuotesStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<super::StreamQuotesResponse, tonic::Status>,
            >
            + std::marker::Send
            + 'static;
        /** Stream real-time quotes. Ends with UNAVAILABLE when the upstream link
 fails or this client cannot keep up.
*/
        async fn stream_quotes(
            &self,
            request: tonic::Request<super::StreamQuotesRequest>,
        ) -> std::result::Result<
            tonic::Response<Self::StreamQuotesStream>,
            tonic::Status,
        >;
        /** Fetch a one-off board snapshot (privileged, uses the session token).
*/
        async fn get_quote(
            &self,
            request: tonic::Request<super::GetQuoteRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetQuoteResponse>,
            tonic::Status,
        >;
        /** Report session and stream status.
*/
        async fn get_session_status(
            &self,
            request: tonic::Request<super::GetSessionStatusRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetSessionStatusResponse>,
            tonic::Status,
        >;
        /** Discard the cached session token and log in again.
*/
        async fn refresh_session(
            &self,
            request: tonic::Request<super::RefreshSessionRequest>,
        ) -> std::result::Result<
            tonic::Response<super::RefreshSessionResponse>,
            tonic::Status,
        >;
    }
    /** QuoteGatewayService exposes a broker's real-time board feed and session
 through a single gRPC interface. One upstream push connection is shared by
 every StreamQuotes caller.
*/
    #[derive(Debug)]
    pub struct QuoteGatewayServiceServer<T> {
        inner: Arc<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    impl<T> QuoteGatewayServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.max_encoding_message_size = Some(limit);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for QuoteGatewayServiceServer<T>
    where
        T: QuoteGatewayService,
        B: Body + std::marker::Send + 'static,
        B::Error: Into<StdError> + std::marker::Send + 'static,
    {
        type Response = http::Response<tonic::body::Body>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                "/quote_gateway.v1.QuoteGatewayService/StreamQuotes" => {
                    #[allow(non_camel_case_types)]
                    struct StreamQuotesSvc<T: QuoteGatewayService>(pub Arc<T>);
                    impl<
                        T: QuoteGatewayService,
                    > tonic::server::ServerStreamingService<super::StreamQuotesRequest>
                    for StreamQuotesSvc<T> {
                        type Response = super::StreamQuotesResponse;
                        type ResponseStream = T::StreamQuotesStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::StreamQuotesRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as QuoteGatewayService>::stream_quotes(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = StreamQuotesSvc(inner);
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/quote_gateway.v1.QuoteGatewayService/GetQuote" => {
                    #[allow(non_camel_case_types)]
                    struct GetQuoteSvc<T: QuoteGatewayService>(pub Arc<T>);
                    impl<
                        T: QuoteGatewayService,
                    > tonic::server::UnaryService<super::GetQuoteRequest>
                    for GetQuoteSvc<T> {
                        type Response = super::GetQuoteResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetQuoteRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as QuoteGatewayService>::get_quote(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = GetQuoteSvc(inner);
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/quote_gateway.v1.QuoteGatewayService/GetSessionStatus" => {
                    #[allow(non_camel_case_types)]
                    struct GetSessionStatusSvc<T: QuoteGatewayService>(pub Arc<T>);
                    impl<
                        T: QuoteGatewayService,
                    > tonic::server::UnaryService<super::GetSessionStatusRequest>
                    for GetSessionStatusSvc<T> {
                        type Response = super::GetSessionStatusResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetSessionStatusRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as QuoteGatewayService>::get_session_status(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = GetSessionStatusSvc(inner);
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/quote_gateway.v1.QuoteGatewayService/RefreshSession" => {
                    #[allow(non_camel_case_types)]
                    struct RefreshSessionSvc<T: QuoteGatewayService>(pub Arc<T>);
                    impl<
                        T: QuoteGatewayService,
                    > tonic::server::UnaryService<super::RefreshSessionRequest>
                    for RefreshSessionSvc<T> {
                        type Response = super::RefreshSessionResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::RefreshSessionRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as QuoteGatewayService>::refresh_session(&inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let method = RefreshSessionSvc(inner);
                        let codec = tonic_prost::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        let mut response = http::Response::new(
                            tonic::body::Body::default(),
                        );
                        let headers = response.headers_mut();
                        headers
                            .insert(
                                tonic::Status::GRPC_STATUS,
                                (tonic::Code::Unimplemented as i32).into(),
                            );
                        headers
                            .insert(
                                http::header::CONTENT_TYPE,
                                tonic::metadata::GRPC_CONTENT_TYPE,
                            );
                        Ok(response)
                    })
                }
            }
        }
    }
    impl<T> Clone for QuoteGatewayServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    /// Generated gRPC service name
    pub const SERVICE_NAME: &str = "quote_gateway.v1.QuoteGatewayService";
    impl<T> tonic::server::NamedService for QuoteGatewayServiceServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }
}
