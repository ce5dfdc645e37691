//! UDP 数据报通道实现

use crate::{Channel, ClientMessage, LinkError, MAX_DATAGRAM_LEN, RobotMessage};
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;
use tracing::warn;

/// 基于 UDP 的消息通道
///
/// 套接字默认处于非阻塞模式：`receive()` 在无数据时立即返回
/// [`LinkError::Timeout`]，适配单线程逐帧轮询的会话模型。
/// 通过 [`Channel::set_receive_timeout`] 可切换为带超时的阻塞读。
///
/// # Example
///
/// ```no_run
/// use rovi_link::{Channel, UdpChannel};
/// use rovi_protocol::ClientMessage;
///
/// let mut channel = UdpChannel::connect("192.168.42.1:5551").unwrap();
/// channel.send(&ClientMessage::ConnectRequest { client_version: 1 }).unwrap();
/// ```
pub struct UdpChannel {
    socket: UdpSocket,
    recv_buf: Vec<u8>,
}

impl UdpChannel {
    /// 绑定本地临时端口并"连接"到机器人控制进程地址
    ///
    /// UDP 的 connect 只是固定对端地址并启用 ICMP 错误反馈，
    /// 真正的会话建立由上层握手完成。
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(addr)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            recv_buf: vec![0u8; 64 * 1024],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, LinkError> {
        Ok(self.socket.peer_addr()?)
    }

    fn map_io_error(e: std::io::Error) -> LinkError {
        match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => LinkError::Timeout,
            // 对端端口不可达（ICMP 反馈）：视为通道关闭
            ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset => LinkError::Closed,
            _ => LinkError::Io(e),
        }
    }
}

impl Channel for UdpChannel {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), LinkError> {
        let bytes = bincode::serialize(msg)?;
        if bytes.len() > MAX_DATAGRAM_LEN {
            return Err(LinkError::OversizedDatagram {
                size: bytes.len(),
                max: MAX_DATAGRAM_LEN,
            });
        }
        self.socket.send(&bytes).map_err(Self::map_io_error)?;
        Ok(())
    }

    fn receive(&mut self) -> Result<RobotMessage, LinkError> {
        let n = self.socket.recv(&mut self.recv_buf).map_err(Self::map_io_error)?;
        Ok(bincode::deserialize(&self.recv_buf[..n])?)
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        let result = if timeout.is_zero() {
            self.socket.set_nonblocking(true)
        } else {
            self.socket
                .set_nonblocking(false)
                .and_then(|_| self.socket.set_read_timeout(Some(timeout)))
        };
        if let Err(e) = result {
            warn!("Failed to set receive timeout: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rovi_protocol::RobotId;
    use std::time::Instant;

    /// 本地回环：客户端通道 ↔ 裸 UdpSocket 扮演机器人
    #[test]
    fn test_udp_channel_roundtrip() {
        let robot = UdpSocket::bind("127.0.0.1:0").unwrap();
        let robot_addr = robot.local_addr().unwrap();
        robot.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

        let mut channel = UdpChannel::connect(robot_addr).unwrap();
        channel
            .send(&ClientMessage::ConnectRequest { client_version: 1 })
            .unwrap();

        // 机器人侧收到并解码握手请求
        let mut buf = [0u8; 2048];
        let (n, client_addr) = robot.recv_from(&mut buf).unwrap();
        let msg: ClientMessage = bincode::deserialize(&buf[..n]).unwrap();
        assert_eq!(msg, ClientMessage::ConnectRequest { client_version: 1 });

        // 机器人侧回应握手
        let reply = RobotMessage::ConnectResponse {
            accepted: true,
            robot_id: RobotId(42),
        };
        robot
            .send_to(&bincode::serialize(&reply).unwrap(), client_addr)
            .unwrap();

        // 非阻塞接收：回环投递极快，轮询等待到达
        let deadline = Instant::now() + Duration::from_secs(2);
        let received = loop {
            match channel.try_receive().unwrap() {
                Some(msg) => break msg,
                None => {
                    assert!(Instant::now() < deadline, "reply never arrived");
                    std::thread::sleep(Duration::from_millis(1));
                },
            }
        };
        assert_eq!(received, reply);
    }

    #[test]
    fn test_receive_empty_is_timeout() {
        let robot = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut channel = UdpChannel::connect(robot.local_addr().unwrap()).unwrap();
        match channel.receive() {
            Err(LinkError::Timeout) => {},
            other => panic!("expected Timeout, got {:?}", other.map(|m| m.tag_name())),
        }
        assert!(channel.try_receive().unwrap().is_none());
    }
}
