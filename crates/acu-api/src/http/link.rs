// Link management endpoints
//
// Serial port discovery and connecting the backend to the antenna over
// serial or TCP.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::http::client::AcuClient;
use crate::models::{ConnectSerialRequest, ConnectTcpRequest, LinkStatus, PortsResponse, SerialPort};

impl AcuClient {
    /// List serial ports visible to the backend.
    ///
    /// `GET /api/ports`
    pub async fn list_ports(&self) -> Result<Vec<SerialPort>, Error> {
        let resp: PortsResponse = self.get("ports").await?;
        debug!(count = resp.ports.len(), "listed serial ports");
        Ok(resp.ports)
    }

    /// Open the antenna link over a serial port.
    ///
    /// `POST /api/connect_serial`
    pub async fn connect_serial(&self, req: &ConnectSerialRequest) -> Result<LinkStatus, Error> {
        debug!(port = %req.port, baudrate = req.baudrate, "connecting serial");
        self.post("connect_serial", req).await
    }

    /// Open the antenna link over TCP.
    ///
    /// `POST /api/connect_tcp`
    pub async fn connect_tcp(&self, req: &ConnectTcpRequest) -> Result<LinkStatus, Error> {
        debug!(host = %req.host, port = req.port, "connecting tcp");
        self.post("connect_tcp", req).await
    }

    /// Close whichever antenna link is active.
    ///
    /// `POST /api/disconnect`
    pub async fn disconnect(&self) -> Result<LinkStatus, Error> {
        self.post("disconnect", &json!({})).await
    }

    /// Active driver mode (`serial` or `tcp`).
    ///
    /// `GET /api/mode`
    pub async fn mode(&self) -> Result<LinkStatus, Error> {
        self.get("mode").await
    }

    /// Whether the backend currently holds an open antenna link.
    ///
    /// `GET /api/connected`
    pub async fn connected(&self) -> Result<LinkStatus, Error> {
        self.get("connected").await
    }
}
